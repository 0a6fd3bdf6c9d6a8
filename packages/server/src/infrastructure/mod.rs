//! Infrastructure 層
//!
//! ドメイン層の trait（Registry / Broadcaster / Directory）の具体的な
//! 実装と、ワイヤ境界の DTO を提供します。

pub mod broadcaster;
pub mod directory;
pub mod dto;
pub mod repository;
pub mod session;

pub use broadcaster::WebSocketBroadcaster;
pub use directory::{FixedUserDirectory, HttpUserDirectory};
pub use repository::InMemoryRoomRegistry;
pub use session::SessionTracker;
