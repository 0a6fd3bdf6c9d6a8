//! 固定値を返す UserDirectory 実装
//!
//! 外部ディレクトリに依存せず起動したい場合（ローカル開発・統合テスト）
//! に使う。userId をそのままユーザー名として返す。

use async_trait::async_trait;

use crate::domain::{DirectoryError, UserDirectory, UserId, UserProfile};

/// userId から決定的にプロフィールを合成する UserDirectory 実装
pub struct FixedUserDirectory;

impl FixedUserDirectory {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FixedUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for FixedUserDirectory {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<UserProfile, DirectoryError> {
        Ok(UserProfile {
            user_id: user_id.clone(),
            username: user_id.as_str().to_string(),
            avatar_variant: "default".to_string(),
        })
    }
}
