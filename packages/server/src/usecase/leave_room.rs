//! UseCase: Room 退出処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - Room 退出処理（スロット削除、空 Room の削除、シグナルの配信）
//!
//! ### なぜこのテストが必要か
//! - 退出後のスロット詰めと、ホスト退出時に host_id が残ることの保証
//! - 最後のメンバーが抜けた Room が削除されることの確認
//! - leave room / delete room シグナルの出し分けを検証
//!
//! ### どのような状況を想定しているか
//! - 正常系：退出とシグナル配信
//! - 異常系：非メンバーの退出、存在しない Room
//! - エッジケース：最後のメンバーの退出（Room 削除に昇格）

use std::sync::Arc;

use crate::domain::{
    Commit, EventBroadcaster, LobbyError, LobbyEvent, Room, RoomId, RoomRegistry, UserId,
};

/// Room 退出のユースケース
pub struct LeaveRoomUseCase {
    registry: Arc<dyn RoomRegistry>,
    broadcaster: Arc<dyn EventBroadcaster>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>, broadcaster: Arc<dyn EventBroadcaster>) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// Room 退出を実行
    ///
    /// 最後のメンバーが抜けた場合は Room ごと削除する。
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Room))` - 退出後の Room スナップショット
    /// * `Ok(None)` - 退出により Room が空になり、削除された
    /// * `Err(LobbyError)` - 退出失敗
    pub async fn execute(
        &self,
        requester: UserId,
        room_id: RoomId,
    ) -> Result<Option<Room>, LobbyError> {
        // スロット削除と空 Room の刈り取りを 1 つの直列化区間で行う。
        // mutate と delete を分けると、その隙間に参加者が入った Room を
        // 消してしまうため、空判定はクロージャの中で行う。
        let leaver = requester.clone();
        let broadcaster = self.broadcaster.clone();
        let room = self
            .registry
            .mutate(
                &room_id,
                Box::new(move |room| {
                    room.remove_player(&leaver)?;
                    if room.member_count() == 0 {
                        Ok(Commit::Delete)
                    } else {
                        Ok(Commit::Keep)
                    }
                }),
                Box::new(move |room, commit| {
                    Box::pin(async move {
                        match commit {
                            Commit::Delete => {
                                broadcaster
                                    .publish_global(&room.id, LobbyEvent::RoomDeleted)
                                    .await;
                            }
                            Commit::Keep => {
                                broadcaster.publish(&room.id, LobbyEvent::MemberLeft).await;
                            }
                        }
                    })
                }),
            )
            .await?;

        if room.member_count() == 0 {
            tracing::info!("Room '{}' emptied and deleted", room_id.as_str());
            return Ok(None);
        }

        tracing::info!(
            "User '{}' left room '{}' ({} member(s) remain)",
            requester.as_str(),
            room_id.as_str(),
            room.member_count()
        );
        Ok(Some(room))
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

    fn player(id: &str) -> Player {
        Player::new(user(id), id.to_string(), "default".to_string())
    }

    fn test_registry() -> Arc<InMemoryRoomRegistry> {
        Arc::new(InMemoryRoomRegistry::new(Arc::new(FixedClock::new(
            1_700_000_000_000,
        ))))
    }

    async fn seeded_room(registry: &InMemoryRoomRegistry, host: &str, members: &[&str]) -> Room {
        let created = registry
            .create(NewRoom {
                display_name: format!("{}-A1", host),
                host: player(host),
                topic_id: TopicId::new("topic-1".to_string()).unwrap(),
                max_players: DEFAULT_MAX_PLAYERS,
            })
            .await
            .unwrap();
        let mut room = created;
        for member in members {
            let joiner = player(member);
            room = registry
                .mutate(
                    &room.id.clone(),
                    Box::new(move |r| {
                        r.add_player(joiner)?;
                        Ok(Commit::Keep)
                    }),
                    Box::new(|_, _| Box::pin(async {})),
                )
                .await
                .unwrap();
        }
        room
    }

    fn test_usecase(
        registry: Arc<InMemoryRoomRegistry>,
    ) -> (LeaveRoomUseCase, Arc<WebSocketBroadcaster>) {
        let broadcaster = Arc::new(WebSocketBroadcaster::new());
        let usecase = LeaveRoomUseCase::new(registry, broadcaster.clone());
        (usecase, broadcaster)
    }

    #[tokio::test]
    async fn test_leave_room_compacts_slots_and_signals() {
        // テスト項目: 退出でスロットが詰まり、leave room シグナルが流れる
        // given (前提条件):
        let registry = test_registry();
        let created = seeded_room(&registry, "alice", &["bob", "charlie"]).await;
        let (usecase, broadcaster) = test_usecase(registry);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let watcher = ConnectionId::generate();
        broadcaster.register(watcher.clone(), tx).await;
        broadcaster.subscribe(&watcher, created.id.clone()).await;

        // when (操作): 中間スロットの bob が退出
        let room = usecase
            .execute(user("bob"), created.id.clone())
            .await
            .unwrap()
            .unwrap();

        // then (期待する結果):
        let order: Vec<&str> = room.members.iter().map(|p| p.user_id.as_str()).collect();
        assert_eq!(order, vec!["alice", "charlie"]);
        assert!(rx.recv().await.unwrap().contains("leave room"));
    }

    #[tokio::test]
    async fn test_host_leave_keeps_host_id_dangling() {
        // テスト項目: ホスト退出後も host_id は退出者を参照したまま
        // given (前提条件):
        let registry = test_registry();
        let created = seeded_room(&registry, "alice", &["bob"]).await;
        let (usecase, _broadcaster) = test_usecase(registry);

        // when (操作):
        let room = usecase
            .execute(user("alice"), created.id)
            .await
            .unwrap()
            .unwrap();

        // then (期待する結果):
        assert_eq!(room.host_id, user("alice"));
        assert!(!room.is_member(&user("alice")));
        assert_eq!(room.member_count(), 1);
    }

    #[tokio::test]
    async fn test_last_member_leave_deletes_room() {
        // テスト項目: 最後のメンバーの退出で Room が削除され delete room が流れる
        // given (前提条件):
        let registry = test_registry();
        let created = seeded_room(&registry, "alice", &[]).await;
        let (usecase, broadcaster) = test_usecase(registry.clone());

        let (tx, mut rx) = mpsc::unbounded_channel();
        let watcher = ConnectionId::generate();
        broadcaster.register(watcher, tx).await;

        // when (操作):
        let result = usecase.execute(user("alice"), created.id.clone()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(None));
        assert_eq!(registry.room_count().await, 0);
        assert!(rx.recv().await.unwrap().contains("delete room"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_join_racing_last_leave_is_consistent() {
        // テスト項目: 最後の退出と参加が並走しても「参加は成功したのに
        //             Room は消えている」という結果にはならない
        // given (前提条件): alice のみの Room
        let registry = test_registry();
        let created = seeded_room(&registry, "alice", &[]).await;
        let (usecase, broadcaster) = test_usecase(registry.clone());
        let join_usecase = crate::usecase::JoinRoomUseCase::new(
            registry.clone(),
            broadcaster.clone(),
            Arc::new(crate::infrastructure::FixedUserDirectory::new()),
        );

        // when (操作): alice の退出と bob の参加を同時に実行する
        let leave_id = created.id.clone();
        let leave_task = tokio::spawn(async move { usecase.execute(user("alice"), leave_id).await });
        let join_id = created.id.clone();
        let join_task = tokio::spawn(async move { join_usecase.execute(user("bob"), join_id).await });

        let leave_result = leave_task.await.unwrap();
        let join_result = join_task.await.unwrap();

        // then (期待する結果): どちらの順で直列化されても整合する
        match join_result {
            Ok(room) => {
                // 参加が先に成立した場合、Room は bob を残して存続する
                let fetched = registry.get(&room.id).await.unwrap();
                assert!(fetched.is_member(&user("bob")));
                assert!(matches!(leave_result, Ok(Some(_))));
            }
            Err(e) => {
                // 刈り取りが先行した場合、参加は NotFound で Room は残らない
                assert_eq!(e, LobbyError::NotFound);
                assert_eq!(leave_result, Ok(None));
                assert_eq!(registry.room_count().await, 0);
            }
        }
    }

    #[tokio::test]
    async fn test_leave_rejects_non_member() {
        // テスト項目: 非メンバーの退出は NotMember で、状態は変わらない
        // given (前提条件):
        let registry = test_registry();
        let created = seeded_room(&registry, "alice", &["bob"]).await;
        let (usecase, _broadcaster) = test_usecase(registry.clone());

        // when (操作):
        let result = usecase.execute(user("ghost"), created.id.clone()).await;

        // then (期待する結果):
        assert_eq!(result, Err(LobbyError::NotMember));
        assert_eq!(registry.get(&created.id).await.unwrap().member_count(), 2);
    }

    #[tokio::test]
    async fn test_leave_unknown_room_returns_not_found() {
        // テスト項目: 存在しない Room の退出は NotFound
        let registry = test_registry();
        let (usecase, _broadcaster) = test_usecase(registry);
        let unknown = RoomId::new("UNKNOWN1".to_string()).unwrap();
        assert_eq!(
            usecase.execute(user("alice"), unknown).await,
            Err(LobbyError::NotFound)
        );
    }
}
