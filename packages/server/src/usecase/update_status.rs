//! UseCase: Room ステータス更新処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateStatusUseCase::execute() メソッド
//! - `waiting -> started -> finished` の単調遷移と権限検査
//!
//! ### なぜこのテストが必要か
//! - 開始・終了の前提条件（ホスト・人数・現在の状態）の検査を保証
//! - 後退遷移（waiting への巻き戻し等）の拒否を確認
//! - 遷移成功時に update room シグナルが流れることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：開始・終了
//! - 異常系：非ホスト、人数不足、不正な遷移

use std::sync::Arc;

use crate::domain::{
    Commit, EventBroadcaster, LobbyError, LobbyEvent, Room, RoomId, RoomRegistry, RoomStatus,
    UserId,
};

/// Room ステータス更新のユースケース
pub struct UpdateStatusUseCase {
    registry: Arc<dyn RoomRegistry>,
    broadcaster: Arc<dyn EventBroadcaster>,
}

impl UpdateStatusUseCase {
    /// 新しい UpdateStatusUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, broadcaster: Arc<dyn EventBroadcaster>) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// ステータス遷移を実行
    ///
    /// `Waiting` への遷移要求は常に `InvalidState`（後退は許可しない）。
    pub async fn execute(
        &self,
        requester: UserId,
        room_id: RoomId,
        target: RoomStatus,
    ) -> Result<Room, LobbyError> {
        // Registry 経由でアトミックに遷移を適用し、更新シグナルは
        // コミットフックとして直列化区間の内側で配信する
        let broadcaster = self.broadcaster.clone();
        let room = self
            .registry
            .mutate(
                &room_id,
                Box::new(move |room| {
                    match target {
                        RoomStatus::Started => room.start(&requester)?,
                        RoomStatus::Finished => room.finish(&requester)?,
                        RoomStatus::Waiting => return Err(LobbyError::InvalidState),
                    }
                    Ok(Commit::Keep)
                }),
                Box::new(move |room, _| {
                    Box::pin(async move {
                        broadcaster.publish(&room.id, LobbyEvent::RoomUpdated).await;
                    })
                }),
            )
            .await?;

        tracing::info!(
            "Room '{}' transitioned to '{}'",
            room.id.as_str(),
            room.status.as_str()
        );
        Ok(room)
    }
}
