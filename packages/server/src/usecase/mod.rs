//! UseCase 層
//!
//! ロビー操作 1 つにつき 1 つの UseCase を置きます。各 UseCase は
//! ドメイン層の trait（Registry / Broadcaster / Directory）にのみ依存し、
//! 成功時にちょうど 1 回シグナルを配信します（失敗時は配信しない）。

pub mod create_room;
pub mod delete_room;
pub mod get_rooms;
pub mod join_room;
pub mod leave_room;
pub mod transfer_host;
pub mod update_status;

pub use create_room::CreateRoomUseCase;
pub use delete_room::DeleteRoomUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use transfer_host::TransferHostUseCase;
pub use update_status::UpdateStatusUseCase;
