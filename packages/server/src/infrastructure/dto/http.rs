//! HTTP API の DTO 定義
//!
//! Room の読み取りはここで定義する単一の正準的な射影
//! （`RoomDto`）に集約する。呼び出し側ごとの ad hoc な
//! room + topic 結合形は持たない。

use serde::{Deserialize, Serialize};

/// Room のメンバー 1 人分の射影
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDto {
    pub id: String,
    pub username: String,
    pub skin: String,
    #[serde(rename = "isHost")]
    pub is_host: bool,
}

/// Room の正準的な射影（一覧・詳細の両方で使う）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDto {
    pub id: String,
    pub name: String,
    #[serde(rename = "hostId")]
    pub host_id: String,
    #[serde(rename = "topicId")]
    pub topic_id: String,
    pub status: String,
    #[serde(rename = "playersCount")]
    pub players_count: usize,
    #[serde(rename = "maxPlayers")]
    pub max_players: usize,
    pub players: Vec<PlayerDto>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// (user, room) ごとのセッション（参加トークン）の射影
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSessionDto {
    #[serde(rename = "playerCode")]
    pub player_code: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "roomId")]
    pub room_id: String,
}

/// Room のセッション一覧（GET /api/player-sessions の応答）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LobbyDataDto {
    #[serde(rename = "roomId")]
    pub room_id: String,
    pub sessions: Vec<PlayerSessionDto>,
}

// ========================================
// リクエストペイロード
// ========================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(rename = "hostId")]
    pub host_id: String,
    #[serde(rename = "topicId")]
    pub topic_id: String,
    #[serde(rename = "classCode", default)]
    pub class_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModifyPlayerRequest {
    #[serde(rename = "roomId")]
    pub room_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(rename = "roomId")]
    pub room_id: String,
    #[serde(rename = "requesterId")]
    pub requester_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateHostRequest {
    #[serde(rename = "roomId")]
    pub room_id: String,
    #[serde(rename = "requesterId")]
    pub requester_id: String,
    #[serde(rename = "targetId")]
    pub target_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteRoomRequest {
    #[serde(rename = "roomId")]
    pub room_id: String,
    #[serde(rename = "requesterId")]
    pub requester_id: String,
}

/// HTTP エラー応答のボディ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}
