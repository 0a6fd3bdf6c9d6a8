//! HTTP を使った UserDirectory 実装
//!
//! ## 責務
//!
//! - 外部のユーザーディレクトリ API からプロフィールを取得
//!
//! ## 設計ノート
//!
//! ディレクトリは外部コラボレーターの所有物で、ここでは読み取りのみ。
//! 到達不能・タイムアウト・5xx は `DirectoryError::Unavailable` に
//! 丸めて返し、呼び出し側で `UpstreamUnavailable` に変換される。

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{DirectoryError, UserDirectory, UserId, UserProfile};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// ディレクトリ API の応答ボディ
#[derive(Debug, Deserialize)]
struct ApiPlayer {
    id: String,
    username: String,
    #[serde(default)]
    skin: String,
}

/// HTTP を使った UserDirectory 実装
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserDirectory {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, base_url }
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<UserProfile, DirectoryError> {
        let url = format!("{}/api/users/get-player-by-id", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("userId", user_id.as_str())])
            .send()
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DirectoryError::NotFound(user_id.as_str().to_string()));
        }
        if !response.status().is_success() {
            return Err(DirectoryError::Unavailable(format!(
                "directory returned status {}",
                response.status()
            )));
        }

        let player: ApiPlayer = response
            .json()
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        let user_id = UserId::new(player.id)
            .map_err(|e| DirectoryError::Unavailable(format!("invalid user id: {}", e)))?;
        Ok(UserProfile {
            user_id,
            username: player.username,
            avatar_variant: player.skin,
        })
    }
}
