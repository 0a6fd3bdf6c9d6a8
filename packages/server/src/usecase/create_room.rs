//! UseCase: Room 作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//! - Room 作成処理（プロフィール取得、作成シグナルの配信）
//!
//! ### なぜこのテストが必要か
//! - ポリシーの検証：同一ホストが waiting の Room を複数持てない
//!   （検査自体は Registry のテーブルロック内で行われる）
//! - fetch-then-mutate：ディレクトリ到達失敗時に Room が作られないことを保証
//! - 作成成功時にグローバルへ create room シグナルが流れることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：Room 作成とグローバル配信
//! - 異常系：重複ホスト（Conflict）、ディレクトリ到達不能（UpstreamUnavailable）

use std::sync::Arc;

use crate::domain::{
    EventBroadcaster, LobbyError, LobbyEvent, NewRoom, Player, Room, RoomRegistry, TopicId,
    UserDirectory, UserId, DEFAULT_MAX_PLAYERS,
};

/// Room 作成のユースケース
pub struct CreateRoomUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn RoomRegistry>,
    /// Broadcaster（シグナル配信の抽象化）
    broadcaster: Arc<dyn EventBroadcaster>,
    /// Directory（外部ユーザープロフィールの抽象化）
    directory: Arc<dyn UserDirectory>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
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

    /// Room 作成を実行
    ///
    /// # Arguments
    ///
    /// * `requester` - 作成者の認証済みユーザー ID（Domain Model）
    /// * `topic_id` - Room が参照するトピック（Domain Model）
    /// * `class_code` - 表示名に使う任意のコード（空でもよい）
    ///
    /// # Returns
    ///
    /// * `Ok(Room)` - 作成された Room のスナップショット
    /// * `Err(LobbyError)` - 作成失敗
    pub async fn execute(
        &self,
        requester: UserId,
        topic_id: TopicId,
        class_code: String,
    ) -> Result<Room, LobbyError> {
        // 1. 外部ディレクトリからプロフィールを取得（Registry のミューテーション区間の外）
        let profile = self.directory.fetch_profile(&requester).await?;

        // 2. Registry 経由で Room を作成。同一ホストが waiting の Room を
        //    既に持つ場合の Conflict はテーブルロック内で検査される。
        let display_name = if class_code.is_empty() {
            profile.username.clone()
        } else {
            format!("{}-{}", profile.username, class_code)
        };
        let host = Player::new(requester, profile.username, profile.avatar_variant);
        let room = self
            .registry
            .create(NewRoom {
                display_name,
                host,
                topic_id,
                max_players: DEFAULT_MAX_PLAYERS,
            })
            .await?;

        // 3. グローバル一覧トピックへ作成シグナルを配信
        self.broadcaster
            .publish_global(&room.id, LobbyEvent::RoomCreated)
            .await;

        tracing::info!(
            "Room '{}' created by '{}'",
            room.id.as_str(),
            room.host_id.as_str()
        );
        Ok(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DirectoryError, MockUserDirectory, RoomStatus};
    use crate::infrastructure::{FixedUserDirectory, InMemoryRoomRegistry, WebSocketBroadcaster};
    use machiai_shared::time::FixedClock;
    use tokio::sync::mpsc;

    fn test_registry() -> Arc<InMemoryRoomRegistry> {
        Arc::new(InMemoryRoomRegistry::new(Arc::new(FixedClock::new(
            1_700_000_000_000,
        ))))
    }

    fn test_usecase(registry: Arc<InMemoryRoomRegistry>) -> (CreateRoomUseCase, Arc<WebSocketBroadcaster>) {
        let broadcaster = Arc::new(WebSocketBroadcaster::new());
        let usecase = CreateRoomUseCase::new(
            registry,
            broadcaster.clone(),
            Arc::new(FixedUserDirectory::new()),
        );
        (usecase, broadcaster)
    }

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn topic(id: &str) -> TopicId {
        TopicId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_room_success() {
        // テスト項目: Room が作成され、作成者がホスト兼唯一のメンバーになる
        // given (前提条件):
        let registry = test_registry();
        let (usecase, _broadcaster) = test_usecase(registry.clone());

        // when (操作):
        let room = usecase
            .execute(user("alice"), topic("topic-1"), "A1".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(room.host_id, user("alice"));
        assert_eq!(room.member_count(), 1);
        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.display_name, "alice-A1");
        assert_eq!(registry.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_room_publishes_global_signal() {
        // テスト項目: 作成成功時に全接続へ create room シグナルが流れる
        // given (前提条件):
        let registry = test_registry();
        let (usecase, broadcaster) = test_usecase(registry);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let watcher = crate::domain::ConnectionId::generate();
        broadcaster.register(watcher, tx).await;

        // when (操作):
        let room = usecase
            .execute(user("alice"), topic("topic-1"), String::new())
            .await
            .unwrap();

        // then (期待する結果):
        let frame = rx.recv().await.unwrap();
        assert!(frame.contains("create room"));
        assert!(frame.contains(room.id.as_str()));
    }

    #[tokio::test]
    async fn test_create_room_rejects_second_waiting_room_for_same_host() {
        // テスト項目: waiting の Room をホスト中のユーザーの再作成は Conflict
        // given (前提条件):
        let registry = test_registry();
        let (usecase, _broadcaster) = test_usecase(registry.clone());
        usecase
            .execute(user("alice"), topic("topic-1"), String::new())
            .await
            .unwrap();

        // when (操作):
        let result = usecase
            .execute(user("alice"), topic("topic-1"), String::new())
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(LobbyError::Conflict(_))));
        assert_eq!(registry.room_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_room_fails_when_directory_unavailable() {
        // テスト項目: ディレクトリ到達不能時は Room が作られない
        // given (前提条件):
        let registry = test_registry();
        let mut directory = MockUserDirectory::new();
        directory.expect_fetch_profile().returning(|_| {
            Err(DirectoryError::Unavailable("connection refused".to_string()))
        });
        let usecase = CreateRoomUseCase::new(
            registry.clone(),
            Arc::new(WebSocketBroadcaster::new()),
            Arc::new(directory),
        );

        // when (操作):
        let result = usecase
            .execute(user("alice"), topic("topic-1"), String::new())
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(LobbyError::UpstreamUnavailable(_))));
        assert_eq!(registry.room_count().await, 0);
    }
}
