//! Server state and connection management.

use std::sync::Arc;

use crate::domain::{EventBroadcaster, UserDirectory};
use crate::infrastructure::SessionTracker;
use crate::usecase::{
    CreateRoomUseCase, DeleteRoomUseCase, GetRoomsUseCase, JoinRoomUseCase, LeaveRoomUseCase,
    TransferHostUseCase, UpdateStatusUseCase,
};

/// Shared application state
pub struct AppState {
    /// CreateRoomUseCase（Room 作成のユースケース）
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// JoinRoomUseCase（Room 参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// LeaveRoomUseCase（Room 退出のユースケース）
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    /// DeleteRoomUseCase（Room 削除のユースケース）
    pub delete_room_usecase: Arc<DeleteRoomUseCase>,
    /// UpdateStatusUseCase（ステータス遷移のユースケース）
    pub update_status_usecase: Arc<UpdateStatusUseCase>,
    /// TransferHostUseCase（ホスト移譲のユースケース）
    pub transfer_host_usecase: Arc<TransferHostUseCase>,
    /// GetRoomsUseCase（Room 読み取りのユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// SessionTracker（接続とユーザーの対応付け）
    pub session_tracker: Arc<SessionTracker>,
    /// Broadcaster（シグナル配信の抽象化）
    pub broadcaster: Arc<dyn EventBroadcaster>,
    /// Directory（外部ユーザープロフィールの抽象化）
    pub directory: Arc<dyn UserDirectory>,
}
