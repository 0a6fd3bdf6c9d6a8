//! EventBroadcaster trait 定義
//!
//! Room の状態変化を購読中のチャンネルへファンアウトする
//! インターフェース。配信は at-least-once・ベストエフォートで、
//! ペイロードは変化シグナルのみ（スナップショットは含まない）。
//! 受信側は HTTP の読み取り系を再フェッチする（pull-after-push）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::value_object::{ConnectionId, RoomId};

/// クライアントへのメッセージ送信用チャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// ブロードキャストされる状態変化の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LobbyEvent {
    /// Room が作成された（グローバル一覧にも影響）
    RoomCreated,
    /// Room の状態・メンバーシップが更新された
    RoomUpdated,
    /// メンバーが退出した
    MemberLeft,
    /// Room が削除された（グローバル一覧にも影響）
    RoomDeleted,
}

/// EventBroadcaster trait
///
/// 接続は同時に 1 つの Room のみ購読でき、`subscribe` は以前の購読を
/// 置き換える。グローバル一覧トピックは全接続が暗黙に購読している。
/// 個々の接続への送信失敗はログに記録して握りつぶし、他の購読者への
/// 配信を妨げない。
#[async_trait]
pub trait EventBroadcaster: Send + Sync {
    /// 接続を登録する（送信チャンネルを保持する）
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除する（切断時）
    async fn unregister(&self, connection_id: &ConnectionId);

    /// 接続の Room 購読を設定する（以前の購読は置き換え）
    async fn subscribe(&self, connection_id: &ConnectionId, room_id: RoomId);

    /// 接続の Room 購読を解除する
    async fn unsubscribe(&self, connection_id: &ConnectionId);

    /// Room を購読している全接続へ変化シグナルを配信する
    async fn publish(&self, room_id: &RoomId, event: LobbyEvent);

    /// グローバル一覧トピック（全接続）へ変化シグナルを配信する
    async fn publish_global(&self, room_id: &RoomId, event: LobbyEvent);
}
