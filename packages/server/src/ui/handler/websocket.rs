//! WebSocket connection handlers.
//!
//! ロビー同期のゲートウェイ。接続ごとに認証済みユーザーを固定し、
//! インテントを UseCase へ振り分ける。呼び出し元識別にペイロードの
//! userId は決して使わない。

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, LobbyEvent, PusherChannel, RoomId, TopicId, UserId},
    infrastructure::dto::{
        conversion::parse_room_status,
        websocket::{ClientIntent, ServerNotification},
    },
    ui::state::AppState,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    #[serde(rename = "userId")]
    pub user_id: String,
    /// 再接続時に購読を復元する Room（任意）
    #[serde(rename = "roomId", default)]
    pub room_id: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> UserId (Domain Model)
    let user_id = match UserId::new(query.user_id.clone()) {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!("Invalid userId format: '{}'", query.user_id);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let resume_room_id = match query.room_id {
        Some(raw) => match RoomId::new(raw.clone()) {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!("Invalid roomId format: '{}'", raw);
                return Err(StatusCode::BAD_REQUEST);
            }
        },
        None => None,
    };

    // 接続時にディレクトリでユーザーを解決する。未知のユーザーや
    // ディレクトリ到達不能の接続はアップグレード前に拒否する。
    if let Err(e) = state.directory.fetch_profile(&user_id).await {
        return match e {
            crate::domain::DirectoryError::NotFound(_) => {
                tracing::warn!("Unknown user '{}', rejecting connection", user_id.as_str());
                Err(StatusCode::FORBIDDEN)
            }
            crate::domain::DirectoryError::Unavailable(detail) => {
                tracing::error!("User directory unavailable: {}", detail);
                Err(StatusCode::BAD_GATEWAY)
            }
        };
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id, resume_room_id)))
}

/// Spawns a task that receives signals from the rx channel and pushes them to the WebSocket sender.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    user_id: UserId,
    resume_room_id: Option<RoomId>,
) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();

    // 接続をセッションと Broadcaster に登録
    state
        .session_tracker
        .bind(connection_id.clone(), user_id.clone())
        .await;
    state
        .broadcaster
        .register(connection_id.clone(), tx.clone())
        .await;
    tracing::info!(
        "User '{}' connected as '{}'",
        user_id.as_str(),
        connection_id.as_str()
    );

    // 再接続: メンバーである Room の購読を復元する
    if let Some(room_id) = resume_room_id {
        match state.get_rooms_usecase.find(&room_id).await {
            Ok(room) if room.is_member(&user_id) => {
                state.broadcaster.subscribe(&connection_id, room_id.clone()).await;
                state
                    .session_tracker
                    .set_room(&connection_id, Some(room_id.clone()))
                    .await;
                tracing::info!(
                    "Restored subscription of '{}' to room '{}'",
                    user_id.as_str(),
                    room_id.as_str()
                );
            }
            Ok(_) => {
                tracing::warn!(
                    "User '{}' is not a member of room '{}', subscription not restored",
                    user_id.as_str(),
                    room_id.as_str()
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Cannot restore subscription to room '{}': {}",
                    room_id.as_str(),
                    e
                );
            }
        }
    }

    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();
    let user_id_clone = user_id.clone();
    let tx_clone = tx.clone();

    // Spawn a task to receive intents from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let intent = match serde_json::from_str::<ClientIntent>(&text) {
                        Ok(intent) => intent,
                        Err(e) => {
                            tracing::warn!("Failed to parse intent: {}", e);
                            send_frame(
                                &tx_clone,
                                &ServerNotification::Error {
                                    error: "BadRequest".to_string(),
                                    room_id: None,
                                    detail: format!("unparseable intent: {}", e),
                                },
                            );
                            continue;
                        }
                    };

                    dispatch_intent(
                        &state_clone,
                        &connection_id_clone,
                        &user_id_clone,
                        &tx_clone,
                        intent,
                    )
                    .await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to push signals to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // 切断は退出ではない。セッションと購読だけを片付ける。
    state.broadcaster.unregister(&connection_id).await;
    state.session_tracker.on_disconnect(&connection_id).await;
    tracing::info!(
        "User '{}' disconnected ('{}')",
        user_id.as_str(),
        connection_id.as_str()
    );
}

/// シグナルをこの接続自身のチャンネルへ直接送る
fn send_frame(tx: &PusherChannel, notification: &ServerNotification) {
    match serde_json::to_string(notification) {
        Ok(frame) => {
            if tx.send(frame).is_err() {
                tracing::debug!("Connection channel closed, dropping frame");
            }
        }
        Err(e) => tracing::error!("Failed to serialize notification: {}", e),
    }
}

/// パースできない ID をエラー応答にして返すためのヘルパー
fn send_bad_request(tx: &PusherChannel, room_id: Option<String>, detail: String) {
    send_frame(
        tx,
        &ServerNotification::Error {
            error: "BadRequest".to_string(),
            room_id,
            detail,
        },
    );
}

/// インテントを UseCase へ振り分ける
///
/// 成功時の購読の付け替えはここで行う。失敗時はこの接続にのみ
/// エラー応答を返す（他の購読者には何も流れない）。
async fn dispatch_intent(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    user_id: &UserId,
    tx: &PusherChannel,
    intent: ClientIntent,
) {
    match intent {
        ClientIntent::CreateLobby {
            topic_id,
            class_code,
        } => {
            let topic_id = match TopicId::new(topic_id.clone()) {
                Ok(id) => id,
                Err(e) => return send_bad_request(tx, None, format!("invalid topicId: {}", e)),
            };
            match state
                .create_room_usecase
                .execute(user_id.clone(), topic_id, class_code)
                .await
            {
                Ok(room) => {
                    // 作成者は自分の Room を購読する（create room 自体は
                    // グローバル配信で既に届いている）
                    state.broadcaster.subscribe(connection_id, room.id.clone()).await;
                    state
                        .session_tracker
                        .set_room(connection_id, Some(room.id))
                        .await;
                }
                Err(e) => send_frame(tx, &ServerNotification::from_error(&e, None)),
            }
        }
        ClientIntent::JoinLobby { room_id } => {
            let room_id = match RoomId::new(room_id.clone()) {
                Ok(id) => id,
                Err(e) => return send_bad_request(tx, None, format!("invalid roomId: {}", e)),
            };
            match state
                .join_room_usecase
                .execute(user_id.clone(), room_id.clone())
                .await
            {
                Ok(room) => {
                    // update room の配信時点ではまだ購読していないため、
                    // 購読を付けた後に自分へ直接同じシグナルを届ける
                    state.broadcaster.subscribe(connection_id, room.id.clone()).await;
                    state
                        .session_tracker
                        .set_room(connection_id, Some(room.id.clone()))
                        .await;
                    send_frame(
                        tx,
                        &ServerNotification::from_event(LobbyEvent::RoomUpdated, &room.id),
                    );
                }
                Err(e) => send_frame(tx, &ServerNotification::from_error(&e, Some(&room_id))),
            }
        }
        ClientIntent::LeaveRoom { room_id } => {
            let room_id = match RoomId::new(room_id.clone()) {
                Ok(id) => id,
                Err(e) => return send_bad_request(tx, None, format!("invalid roomId: {}", e)),
            };
            match state
                .leave_room_usecase
                .execute(user_id.clone(), room_id.clone())
                .await
            {
                Ok(_) => {
                    // 退出シグナルは購読中に届いているので、購読を外すだけ
                    state.broadcaster.unsubscribe(connection_id).await;
                    state.session_tracker.set_room(connection_id, None).await;
                }
                Err(e) => send_frame(tx, &ServerNotification::from_error(&e, Some(&room_id))),
            }
        }
        ClientIntent::DeleteLobby { room_id } => {
            let room_id = match RoomId::new(room_id.clone()) {
                Ok(id) => id,
                Err(e) => return send_bad_request(tx, None, format!("invalid roomId: {}", e)),
            };
            match state
                .delete_room_usecase
                .execute(user_id.clone(), room_id.clone())
                .await
            {
                Ok(()) => {
                    state.broadcaster.unsubscribe(connection_id).await;
                    state.session_tracker.set_room(connection_id, None).await;
                }
                Err(e) => send_frame(tx, &ServerNotification::from_error(&e, Some(&room_id))),
            }
        }
        ClientIntent::UpdateRoomStatus { room_id, status } => {
            let room_id = match RoomId::new(room_id.clone()) {
                Ok(id) => id,
                Err(e) => return send_bad_request(tx, None, format!("invalid roomId: {}", e)),
            };
            let target = match parse_room_status(&status) {
                Some(target) => target,
                None => {
                    return send_bad_request(
                        tx,
                        Some(room_id.into_string()),
                        format!("unknown status '{}'", status),
                    );
                }
            };
            if let Err(e) = state
                .update_status_usecase
                .execute(user_id.clone(), room_id.clone(), target)
                .await
            {
                send_frame(tx, &ServerNotification::from_error(&e, Some(&room_id)));
            }
        }
        ClientIntent::TransferHost {
            room_id,
            target_user_id,
        } => {
            let room_id = match RoomId::new(room_id.clone()) {
                Ok(id) => id,
                Err(e) => return send_bad_request(tx, None, format!("invalid roomId: {}", e)),
            };
            let target = match UserId::new(target_user_id.clone()) {
                Ok(id) => id,
                Err(e) => {
                    return send_bad_request(
                        tx,
                        Some(room_id.into_string()),
                        format!("invalid targetUserId: {}", e),
                    );
                }
            };
            if let Err(e) = state
                .transfer_host_usecase
                .execute(user_id.clone(), room_id.clone(), target)
                .await
            {
                send_frame(tx, &ServerNotification::from_error(&e, Some(&room_id)));
            }
        }
    }
}
