//! ワイヤ境界の DTO（HTTP / WebSocket）と変換ロジック

pub mod conversion;
pub mod http;
pub mod websocket;
