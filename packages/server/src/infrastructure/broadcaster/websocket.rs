//! WebSocket を使った EventBroadcaster 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` と購読中 Room の管理
//! - 変化シグナルのファンアウト（publish, publish_global）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、シグナル配信に
//! 使用します。
//!
//! 配信はベストエフォートで、個々のチャンネルへの送信失敗は warn ログを
//! 残して握りつぶします。シグナルはスナップショットを含まないため、
//! 取りこぼした受信側も次の再フェッチで追いつけます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventBroadcaster, LobbyEvent, PusherChannel, RoomId};
use crate::infrastructure::dto::websocket::ServerNotification;

/// 接続 1 本分の購読状態
struct Subscriber {
    sender: PusherChannel,
    /// 現在購読している Room（接続あたり高々 1 つ）
    room: Option<RoomId>,
}

/// WebSocket を使った EventBroadcaster 実装
pub struct WebSocketBroadcaster {
    /// 接続中のチャンネルと購読状態
    ///
    /// Key: ConnectionId
    /// Value: Subscriber
    subscribers: Mutex<HashMap<ConnectionId, Subscriber>>,
}

impl WebSocketBroadcaster {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    fn build_frame(room_id: &RoomId, event: LobbyEvent) -> String {
        let notification = ServerNotification::from_event(event, room_id);
        // ServerNotification の直列化は構造上失敗しない
        serde_json::to_string(&notification).unwrap_or_default()
    }
}

impl Default for WebSocketBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBroadcaster for WebSocketBroadcaster {
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut subscribers = self.subscribers.lock().await;
        subscribers.insert(connection_id.clone(), Subscriber { sender, room: None });
        tracing::debug!("Connection '{}' registered to Broadcaster", connection_id.as_str());
    }

    async fn unregister(&self, connection_id: &ConnectionId) {
        let mut subscribers = self.subscribers.lock().await;
        subscribers.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from Broadcaster",
            connection_id.as_str()
        );
    }

    async fn subscribe(&self, connection_id: &ConnectionId, room_id: RoomId) {
        let mut subscribers = self.subscribers.lock().await;
        if let Some(subscriber) = subscribers.get_mut(connection_id) {
            // 以前の購読は置き換える
            subscriber.room = Some(room_id);
        } else {
            tracing::warn!(
                "Subscribe for unknown connection '{}', ignoring",
                connection_id.as_str()
            );
        }
    }

    async fn unsubscribe(&self, connection_id: &ConnectionId) {
        let mut subscribers = self.subscribers.lock().await;
        if let Some(subscriber) = subscribers.get_mut(connection_id) {
            subscriber.room = None;
        }
    }

    async fn publish(&self, room_id: &RoomId, event: LobbyEvent) {
        let frame = Self::build_frame(room_id, event);
        let subscribers = self.subscribers.lock().await;

        for (connection_id, subscriber) in subscribers.iter() {
            if subscriber.room.as_ref() != Some(room_id) {
                continue;
            }
            // 配信では一部の送信失敗を許容
            if let Err(e) = subscriber.sender.send(frame.clone()) {
                tracing::warn!(
                    "Failed to push signal to connection '{}': {}",
                    connection_id.as_str(),
                    e
                );
            } else {
                tracing::debug!(
                    "Published {:?} for room '{}' to connection '{}'",
                    event,
                    room_id.as_str(),
                    connection_id.as_str()
                );
            }
        }
    }

    async fn publish_global(&self, room_id: &RoomId, event: LobbyEvent) {
        let frame = Self::build_frame(room_id, event);
        let subscribers = self.subscribers.lock().await;

        for (connection_id, subscriber) in subscribers.iter() {
            if let Err(e) = subscriber.sender.send(frame.clone()) {
                tracing::warn!(
                    "Failed to push global signal to connection '{}': {}",
                    connection_id.as_str(),
                    e
                );
            }
        }
        tracing::debug!(
            "Published global {:?} for room '{}' to {} connection(s)",
            event,
            room_id.as_str(),
            subscribers.len()
        );
    }
}
