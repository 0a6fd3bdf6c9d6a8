//! UseCase: Room 参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - Room 参加処理（プロフィール取得、スロット追加、更新シグナルの配信）
//!
//! ### なぜこのテストが必要か
//! - waiting 以外・満員・重複参加の拒否が正しく伝搬することを保証
//! - fetch-then-mutate：ディレクトリ取得が Room ロックの外で完了すること
//! - 参加成功時に購読者へ update room シグナルが流れることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加とシグナル配信
//! - 異常系：存在しない Room、満員、開始済み、重複参加

use std::sync::Arc;

use crate::domain::{
    Commit, EventBroadcaster, LobbyError, LobbyEvent, Player, Room, RoomId, RoomRegistry,
    UserDirectory, UserId,
};

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
    broadcaster: Arc<dyn EventBroadcaster>,
    directory: Arc<dyn UserDirectory>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        broadcaster: Arc<dyn EventBroadcaster>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            directory,
        }
    }

    /// Room 参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - 参加後の Room スナップショット
    /// * `Err(LobbyError)` - 参加失敗（Room の状態は変更されない）
    pub async fn execute(&self, requester: UserId, room_id: RoomId) -> Result<Room, LobbyError> {
        // 1. プロフィール取得はミューテーション区間の外で済ませる
        let profile = self.directory.fetch_profile(&requester).await?;
        let player = Player::new(requester, profile.username, profile.avatar_variant);

        // 2. Registry 経由でアトミックにスロットを追加。更新シグナルは
        //    コミットフックとして直列化区間の内側で配信し、同一 Room の
        //    シグナル順をコミット順に揃える。
        let broadcaster = self.broadcaster.clone();
        let room = self
            .registry
            .mutate(
                &room_id,
                Box::new(move |room| {
                    room.add_player(player)?;
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
            "User joined room '{}' ({}/{})",
            room.id.as_str(),
            room.member_count(),
            room.max_players
        );
        Ok(room)
    }
}
