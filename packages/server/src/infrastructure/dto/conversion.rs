//! DTO とドメインモデルの変換ロジック

use machiai_shared::time::timestamp_to_rfc3339;

use crate::domain::{LobbyEvent, Room, RoomId, RoomStatus};
use crate::infrastructure::dto::http::{LobbyDataDto, PlayerDto, PlayerSessionDto, RoomDto};
use crate::infrastructure::dto::websocket::ServerNotification;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Room> for RoomDto {
    fn from(room: &Room) -> Self {
        let players = room
            .members
            .iter()
            .map(|p| PlayerDto {
                id: p.user_id.as_str().to_string(),
                username: p.display_name.clone(),
                skin: p.avatar_variant.clone(),
                is_host: p.user_id == room.host_id,
            })
            .collect();

        Self {
            id: room.id.as_str().to_string(),
            name: room.display_name.clone(),
            host_id: room.host_id.as_str().to_string(),
            topic_id: room.topic_id.as_str().to_string(),
            status: room.status.as_str().to_string(),
            players_count: room.member_count(),
            max_players: room.max_players,
            players,
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for LobbyDataDto {
    fn from(room: &Room) -> Self {
        let sessions = room
            .members
            .iter()
            .map(|p| PlayerSessionDto {
                player_code: p.membership_code.as_str().to_string(),
                user_id: p.user_id.as_str().to_string(),
                room_id: room.id.as_str().to_string(),
            })
            .collect();

        Self {
            room_id: room.id.as_str().to_string(),
            sessions,
        }
    }
}

impl ServerNotification {
    /// ドメインのイベント種別から変化シグナルを組み立てる
    pub fn from_event(event: LobbyEvent, room_id: &RoomId) -> Self {
        let room_id = room_id.as_str().to_string();
        match event {
            LobbyEvent::RoomCreated => ServerNotification::CreateRoom { room_id },
            LobbyEvent::RoomUpdated => ServerNotification::UpdateRoom { room_id },
            LobbyEvent::MemberLeft => ServerNotification::LeaveRoom { room_id },
            LobbyEvent::RoomDeleted => ServerNotification::DeleteRoom { room_id },
        }
    }

    /// 失敗したインテントへのエラー応答を組み立てる
    pub fn from_error(error: &crate::domain::LobbyError, room_id: Option<&RoomId>) -> Self {
        ServerNotification::Error {
            error: error.code().to_string(),
            room_id: room_id.map(|id| id.as_str().to_string()),
            detail: error.to_string(),
        }
    }
}

/// ワイヤ上のステータス文字列をドメインの RoomStatus に変換する
///
/// 歴史的事情で "start" と "started" の両方を started として受け付ける。
pub fn parse_room_status(value: &str) -> Option<RoomStatus> {
    match value {
        "waiting" => Some(RoomStatus::Waiting),
        "start" | "started" => Some(RoomStatus::Started),
        "finished" => Some(RoomStatus::Finished),
        _ => None,
    }
}
