//! UseCase: ホスト移譲処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - TransferHostUseCase::execute() メソッド
//! - ホスト権限のアトミックな移譲と update room シグナルの配信
//!
//! ### なぜこのテストが必要か
//! - 非ホストの移譲要求（Forbidden）と非メンバーへの移譲（NotMember）の拒否
//! - 移譲がスロット順に影響しないことの確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーへの移譲
//! - 異常系：非ホストの要求、非メンバーへの移譲
//! - エッジケース：自分自身への移譲（no-op だが成功）

use std::sync::Arc;

use crate::domain::{
    Commit, EventBroadcaster, LobbyError, LobbyEvent, Room, RoomId, RoomRegistry, UserId,
};

/// ホスト移譲のユースケース
pub struct TransferHostUseCase {
    registry: Arc<dyn RoomRegistry>,
    broadcaster: Arc<dyn EventBroadcaster>,
}

impl TransferHostUseCase {
    /// 新しい TransferHostUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, broadcaster: Arc<dyn EventBroadcaster>) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// ホスト移譲を実行
    pub async fn execute(
        &self,
        requester: UserId,
        room_id: RoomId,
        target: UserId,
    ) -> Result<Room, LobbyError> {
        // Registry 経由でアトミックに移譲を適用し、更新シグナルは
        // コミットフックとして直列化区間の内側で配信する
        let broadcaster = self.broadcaster.clone();
        let room = self
            .registry
            .mutate(
                &room_id,
                Box::new(move |room| {
                    room.transfer_host(&requester, &target)?;
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
            "Host of room '{}' transferred to '{}'",
            room.id.as_str(),
            room.host_id.as_str()
        );
        Ok(room)
    }
}
