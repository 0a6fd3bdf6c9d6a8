//! HTTP / WebSocket endpoint handlers.

pub mod http;
pub mod websocket;

pub use http::{
    create_room, delete_room, get_player_sessions, get_room_detail, get_rooms, health_check,
    join_room, leave_room, update_room_host, update_room_status,
};
pub use websocket::websocket_handler;
