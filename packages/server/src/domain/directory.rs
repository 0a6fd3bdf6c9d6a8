//! UserDirectory trait 定義
//!
//! ユーザー認証・プロフィールは外部コラボレーターの所有物であり、
//! この trait を通してのみアクセスする。HTTP 呼び出しは Registry の
//! ミューテーション区間の外で完了させること（fetch-then-mutate）。

use async_trait::async_trait;

use super::error::DirectoryError;
use super::value_object::UserId;

/// 外部ディレクトリから取得したユーザープロフィール
///
/// `avatar_variant` は表示専用（元データの skin に相当）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: UserId,
    pub username: String,
    pub avatar_variant: String,
}

/// UserDirectory trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// ユーザープロフィールを取得する
    ///
    /// 到達不能・タイムアウトは `DirectoryError::Unavailable` として
    /// 呼び出し側に返し、`UpstreamUnavailable` へ変換される。
    async fn fetch_profile(&self, user_id: &UserId) -> Result<UserProfile, DirectoryError>;
}
