//! SessionTracker の実装
//!
//! ## 責務
//!
//! - 接続（チャンネル）と認証済みユーザーの対応付け
//! - 接続が現在参加している Room の記録
//!
//! ## 設計ノート
//!
//! インテントの呼び出し元識別は常にここに記録された userId を使う。
//! ペイロードに含まれる userId はどこでも参照しない。
//!
//! 切断は退出を意味しない。`on_disconnect` はセッションを消すだけで、
//! Room のメンバーシップには触れない。再接続したユーザーは参加トークン
//! （membership code）で継続を証明する。

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, RoomId, UserId};

/// 接続 1 本分のセッション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub room_id: Option<RoomId>,
}

/// 接続とユーザー・Room の対応を追跡する
pub struct SessionTracker {
    sessions: Mutex<HashMap<ConnectionId, Session>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// 接続を認証済みユーザーに対応付ける（接続確立時）
    pub async fn bind(&self, connection_id: ConnectionId, user_id: UserId) {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(
            connection_id.clone(),
            Session {
                user_id,
                room_id: None,
            },
        );
        tracing::debug!("Session bound for connection '{}'", connection_id.as_str());
    }

    /// 接続が参加中の Room を記録する
    pub async fn set_room(&self, connection_id: &ConnectionId, room_id: Option<RoomId>) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(connection_id) {
            session.room_id = room_id;
        }
    }

    /// 接続に対応付けられたユーザーを返す
    pub async fn user(&self, connection_id: &ConnectionId) -> Option<UserId> {
        let sessions = self.sessions.lock().await;
        sessions.get(connection_id).map(|s| s.user_id.clone())
    }

    /// 接続が現在参加している Room を返す
    pub async fn current_room(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let sessions = self.sessions.lock().await;
        sessions.get(connection_id).and_then(|s| s.room_id.clone())
    }

    /// 切断時にセッションを削除する
    ///
    /// 削除したセッションを返す。Room のメンバーシップは変更しない。
    pub async fn on_disconnect(&self, connection_id: &ConnectionId) -> Option<Session> {
        let mut sessions = self.sessions.lock().await;
        let removed = sessions.remove(connection_id);
        if removed.is_some() {
            tracing::debug!(
                "Session removed for connection '{}'",
                connection_id.as_str()
            );
        }
        removed
    }

    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.lock().await;
        sessions.len()
    }
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}
