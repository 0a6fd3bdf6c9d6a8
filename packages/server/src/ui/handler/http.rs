//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    domain::{LobbyError, RoomId, RoomStatus, TopicId, UserId, ValidationError},
    infrastructure::dto::{
        conversion::parse_room_status,
        http::{
            CreateRoomRequest, DeleteRoomRequest, ErrorBody, LobbyDataDto, ModifyPlayerRequest,
            RoomDto, UpdateHostRequest, UpdateStatusRequest,
        },
    },
    ui::state::AppState,
};

/// LobbyError を HTTP ステータスとエラーボディに変換する
///
/// エラー分類とステータスの対応はここで一元管理する。
pub fn lobby_error_response(error: LobbyError) -> (StatusCode, Json<ErrorBody>) {
    let status = match &error {
        LobbyError::NotFound => StatusCode::NOT_FOUND,
        LobbyError::Conflict(_) | LobbyError::AlreadyMember | LobbyError::RoomFull => {
            StatusCode::CONFLICT
        }
        LobbyError::Forbidden | LobbyError::NotMember => StatusCode::FORBIDDEN,
        LobbyError::NotEnoughPlayers | LobbyError::InvalidState | LobbyError::RoomNotJoinable => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LobbyError::ResourceExhausted => StatusCode::SERVICE_UNAVAILABLE,
        LobbyError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
    };
    let body = ErrorBody {
        error: error.code().to_string(),
        detail: error.to_string(),
    };
    (status, Json(body))
}

fn bad_request(error: ValidationError) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: "BadRequest".to_string(),
            detail: error.to_string(),
        }),
    )
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let dtos: Vec<RoomDto> = rooms.iter().map(RoomDto::from).collect();
    Json(dtos)
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDto>, (StatusCode, Json<ErrorBody>)> {
    let room_id = RoomId::new(room_id).map_err(bad_request)?;
    let room = state
        .get_rooms_usecase
        .find(&room_id)
        .await
        .map_err(lobby_error_response)?;
    Ok(Json(RoomDto::from(&room)))
}

/// Query parameters for player sessions lookup
#[derive(Debug, Deserialize)]
pub struct PlayerSessionsQuery {
    #[serde(rename = "roomId")]
    pub room_id: String,
}

/// Get membership codes for a room
pub async fn get_player_sessions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlayerSessionsQuery>,
) -> Result<Json<LobbyDataDto>, (StatusCode, Json<ErrorBody>)> {
    let room_id = RoomId::new(query.room_id).map_err(bad_request)?;
    let room = state
        .get_rooms_usecase
        .find(&room_id)
        .await
        .map_err(lobby_error_response)?;
    Ok(Json(LobbyDataDto::from(&room)))
}

/// Create a room
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<Json<RoomDto>, (StatusCode, Json<ErrorBody>)> {
    let host_id = UserId::new(request.host_id).map_err(bad_request)?;
    let topic_id = TopicId::new(request.topic_id).map_err(bad_request)?;
    let room = state
        .create_room_usecase
        .execute(host_id, topic_id, request.class_code)
        .await
        .map_err(lobby_error_response)?;
    Ok(Json(RoomDto::from(&room)))
}

/// Join a room
pub async fn join_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModifyPlayerRequest>,
) -> Result<Json<RoomDto>, (StatusCode, Json<ErrorBody>)> {
    let user_id = UserId::new(request.user_id).map_err(bad_request)?;
    let room_id = RoomId::new(request.room_id).map_err(bad_request)?;
    let room = state
        .join_room_usecase
        .execute(user_id, room_id)
        .await
        .map_err(lobby_error_response)?;
    Ok(Json(RoomDto::from(&room)))
}

/// Leave a room
pub async fn leave_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModifyPlayerRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorBody>)> {
    let user_id = UserId::new(request.user_id).map_err(bad_request)?;
    let room_id = RoomId::new(request.room_id).map_err(bad_request)?;
    let remaining = state
        .leave_room_usecase
        .execute(user_id, room_id)
        .await
        .map_err(lobby_error_response)?;
    match remaining {
        Some(room) => Ok(Json(serde_json::json!({"room": RoomDto::from(&room)}))),
        None => Ok(Json(serde_json::json!({"room": null, "deleted": true}))),
    }
}

/// Update room status
pub async fn update_room_status(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<RoomDto>, (StatusCode, Json<ErrorBody>)> {
    let requester = UserId::new(request.requester_id).map_err(bad_request)?;
    let room_id = RoomId::new(request.room_id).map_err(bad_request)?;
    let target: RoomStatus = match parse_room_status(&request.status) {
        Some(status) => status,
        None => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "BadRequest".to_string(),
                    detail: format!("unknown status '{}'", request.status),
                }),
            ));
        }
    };
    let room = state
        .update_status_usecase
        .execute(requester, room_id, target)
        .await
        .map_err(lobby_error_response)?;
    Ok(Json(RoomDto::from(&room)))
}

/// Transfer room host
pub async fn update_room_host(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateHostRequest>,
) -> Result<Json<RoomDto>, (StatusCode, Json<ErrorBody>)> {
    let requester = UserId::new(request.requester_id).map_err(bad_request)?;
    let target = UserId::new(request.target_id).map_err(bad_request)?;
    let room_id = RoomId::new(request.room_id).map_err(bad_request)?;
    let room = state
        .transfer_host_usecase
        .execute(requester, room_id, target)
        .await
        .map_err(lobby_error_response)?;
    Ok(Json(RoomDto::from(&room)))
}

/// Delete a room
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeleteRoomRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorBody>)> {
    let requester = UserId::new(request.requester_id).map_err(bad_request)?;
    let room_id = RoomId::new(request.room_id).map_err(bad_request)?;
    state
        .delete_room_usecase
        .execute(requester, room_id)
        .await
        .map_err(lobby_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
