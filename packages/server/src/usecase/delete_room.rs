//! UseCase: Room 削除処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DeleteRoomUseCase::execute() メソッド
//! - ホスト権限の検査と Room の削除、delete room シグナルの配信
//!
//! ### なぜこのテストが必要か
//! - 非ホストによる削除の拒否（Forbidden）を保証
//! - 削除成功時にグローバルへ delete room シグナルが流れることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ホストによる削除
//! - 異常系：非ホストの削除要求、存在しない Room

use std::sync::Arc;

use crate::domain::{
    Commit, EventBroadcaster, LobbyError, LobbyEvent, RoomId, RoomRegistry, UserId,
};

/// Room 削除のユースケース
pub struct DeleteRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
    broadcaster: Arc<dyn EventBroadcaster>,
}

impl DeleteRoomUseCase {
    /// 新しい DeleteRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, broadcaster: Arc<dyn EventBroadcaster>) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// Room 削除を実行
    ///
    /// ホストのみが削除できる。成功時はグローバル一覧トピックへ
    /// delete room シグナルを配信する。
    pub async fn execute(&self, requester: UserId, room_id: RoomId) -> Result<(), LobbyError> {
        // ホスト権限の検査と削除を 1 つの直列化区間で行い、削除シグナルも
        // その内側で配信する。検査と削除を分けると、その隙間のホスト移譲を
        // 取りこぼす。
        let checker = requester.clone();
        let broadcaster = self.broadcaster.clone();
        self.registry
            .mutate(
                &room_id,
                Box::new(move |room| {
                    if room.host_id != checker {
                        return Err(LobbyError::Forbidden);
                    }
                    Ok(Commit::Delete)
                }),
                Box::new(move |room, _| {
                    Box::pin(async move {
                        broadcaster
                            .publish_global(&room.id, LobbyEvent::RoomDeleted)
                            .await;
                    })
                }),
            )
            .await?;

        tracing::info!(
            "Room '{}' deleted by host '{}'",
            room_id.as_str(),
            requester.as_str()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, NewRoom, Player, TopicId, DEFAULT_MAX_PLAYERS};
    use crate::infrastructure::{InMemoryRoomRegistry, WebSocketBroadcaster};
    use machiai_shared::time::FixedClock;
    use tokio::sync::mpsc;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn test_registry() -> Arc<InMemoryRoomRegistry> {
        Arc::new(InMemoryRoomRegistry::new(Arc::new(FixedClock::new(
            1_700_000_000_000,
        ))))
    }

    async fn seeded_room(registry: &InMemoryRoomRegistry, host: &str) -> RoomId {
        registry
            .create(NewRoom {
                display_name: format!("{}-A1", host),
                host: Player::new(user(host), host.to_string(), "default".to_string()),
                topic_id: TopicId::new("topic-1".to_string()).unwrap(),
                max_players: DEFAULT_MAX_PLAYERS,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_delete_room_by_host_publishes_global_signal() {
        // テスト項目: ホストによる削除が成功し、全接続へ delete room が流れる
        // given (前提条件):
        let registry = test_registry();
        let room_id = seeded_room(&registry, "alice").await;
        let broadcaster = Arc::new(WebSocketBroadcaster::new());
        let usecase = DeleteRoomUseCase::new(registry.clone(), broadcaster.clone());

        let (tx, mut rx) = mpsc::unbounded_channel();
        broadcaster.register(ConnectionId::generate(), tx).await;

        // when (操作):
        usecase.execute(user("alice"), room_id.clone()).await.unwrap();

        // then (期待する結果):
        assert_eq!(registry.room_count().await, 0);
        let frame = rx.recv().await.unwrap();
        assert!(frame.contains("delete room"));
        assert!(frame.contains(room_id.as_str()));
    }

    #[tokio::test]
    async fn test_delete_room_rejects_non_host() {
        // テスト項目: 非ホストによる削除は Forbidden で、Room は残る
        // given (前提条件):
        let registry = test_registry();
        let room_id = seeded_room(&registry, "alice").await;
        let usecase =
            DeleteRoomUseCase::new(registry.clone(), Arc::new(WebSocketBroadcaster::new()));

        // when (操作):
        let result = usecase.execute(user("bob"), room_id).await;

        // then (期待する結果):
        assert_eq!(result, Err(LobbyError::Forbidden));
        assert_eq!(registry.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_room_returns_not_found() {
        // テスト項目: 存在しない Room の削除は NotFound
        let registry = test_registry();
        let usecase = DeleteRoomUseCase::new(registry, Arc::new(WebSocketBroadcaster::new()));
        let unknown = RoomId::new("UNKNOWN1".to_string()).unwrap();
        assert_eq!(
            usecase.execute(user("alice"), unknown).await,
            Err(LobbyError::NotFound)
        );
    }
}
