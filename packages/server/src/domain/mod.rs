//! ドメイン層
//!
//! ロビー同期のエンティティ・値オブジェクト・エラー分類と、
//! ドメインが必要とするインターフェース（Registry / Broadcaster /
//! Directory）を定義します。具体的な実装は Infrastructure 層が提供
//! します（依存性の逆転）。

pub mod broadcaster;
pub mod directory;
pub mod entity;
pub mod error;
pub mod registry;
pub mod value_object;

pub use broadcaster::{EventBroadcaster, LobbyEvent, PusherChannel};
pub use directory::{UserDirectory, UserProfile};
#[cfg(test)]
pub use directory::MockUserDirectory;
pub use entity::{DEFAULT_MAX_PLAYERS, MIN_PLAYERS_TO_START, Player, Room, RoomStatus};
pub use error::{DirectoryError, LobbyError, ValidationError};
pub use registry::{Commit, CommitHook, MutateFn, NewRoom, RoomRegistry};
pub use value_object::{
    ConnectionId, MembershipCode, RoomId, RoomIdFactory, Timestamp, TopicId, UserId,
};
