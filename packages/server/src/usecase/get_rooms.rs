//! UseCase: Room 一覧・詳細取得処理
//!
//! 読み取り系は Registry のスナップショットをそのまま返す。
//! 変化シグナルを受けたクライアントはここを再フェッチして
//! 権威ある状態に追いつく（pull-after-push）。

use std::sync::Arc;

use crate::domain::{LobbyError, Room, RoomId, RoomRegistry};

/// Room 読み取りのユースケース
pub struct GetRoomsUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 全 Room のスナップショット一覧を取得（作成時刻の昇順）
    pub async fn execute(&self) -> Vec<Room> {
        let mut rooms = self.registry.list_all().await;
        rooms.sort_by_key(|r| r.created_at);
        rooms
    }

    /// 単一 Room のスナップショットを取得
    pub async fn find(&self, room_id: &RoomId) -> Result<Room, LobbyError> {
        self.registry.get(room_id).await
    }
}
