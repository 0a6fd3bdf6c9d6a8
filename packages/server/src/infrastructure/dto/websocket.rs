//! WebSocket メッセージの DTO 定義
//!
//! クライアント → サーバーは `eventType` でタグ付けされたインテント、
//! サーバー → クライアントは `message` でタグ付けされた変化シグナル。
//! シグナルはスナップショットを含まない。受信側は読み取り系 API を
//! 再フェッチして権威ある状態を得る（pull-after-push）。

use serde::{Deserialize, Serialize};

/// クライアントから送られるインテント
///
/// ペイロードに `userId` が含まれていても無視される。呼び出し元の
/// 識別は常に認証済み接続の userId に置き換えられる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType")]
pub enum ClientIntent {
    #[serde(rename = "create-lobby")]
    CreateLobby {
        #[serde(rename = "topicId")]
        topic_id: String,
        #[serde(rename = "classCode", default)]
        class_code: String,
    },
    #[serde(rename = "join-lobby")]
    JoinLobby {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    #[serde(rename = "leave-room")]
    LeaveRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    #[serde(rename = "delete-lobby")]
    DeleteLobby {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    #[serde(rename = "update-room-status")]
    UpdateRoomStatus {
        #[serde(rename = "roomId")]
        room_id: String,
        status: String,
    },
    #[serde(rename = "transfer-host")]
    TransferHost {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "targetUserId")]
        target_user_id: String,
    },
}

/// サーバーから配信される変化シグナル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "message")]
pub enum ServerNotification {
    #[serde(rename = "create room")]
    CreateRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    #[serde(rename = "update room")]
    UpdateRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    #[serde(rename = "leave room")]
    LeaveRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    #[serde(rename = "delete room")]
    DeleteRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    /// 失敗したインテントへの応答（発行元チャンネルにのみ送られる）
    #[serde(rename = "error")]
    Error {
        error: String,
        #[serde(rename = "roomId", skip_serializing_if = "Option::is_none")]
        room_id: Option<String>,
        detail: String,
    },
}
