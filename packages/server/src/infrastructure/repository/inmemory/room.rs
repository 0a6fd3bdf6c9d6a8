//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! RoomId をキーとした `Arc<Mutex<Room>>` のアリーナを保持し、
//! Room ごとのロックでミューテーションを直列化します
//! （グローバルな書き込みロックは持たない）。
//!
//! 削除は `Commit::Delete` を返した mutate が Room ロックを保持した
//! まま行うため、Room の全ミューテーション順序に参加します。孤児化した
//! Arc へコミットが紛れ込むことはありません。
//!
//! ## ロック順序
//!
//! テーブルロックを保持したまま Room ロックを取ることはしない
//! （Arc をクローンしてからテーブルロックを手放す）。`mutate` は
//! Room ロック保持中にテーブルへ再アクセスするが、テーブルロックの
//! 保持側が Room ロックを待つことはないため循環しない。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use machiai_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    Commit, CommitHook, LobbyError, MutateFn, NewRoom, Room, RoomId, RoomIdFactory, RoomRegistry,
    RoomStatus, Timestamp, UserId,
};

/// Room テーブルの既定の上限
const DEFAULT_MAX_ROOMS: usize = 1024;

/// RoomId 採番の再試行回数
const ID_ALLOCATION_ATTEMPTS: usize = 8;

/// テーブル 1 エントリ分
///
/// `host_id` / `waiting` は create のホスト重複検査がテーブルロック
/// だけで読めるよう、コミット時に複製されるメタデータ。
struct RoomSlot {
    room: Arc<Mutex<Room>>,
    host_id: UserId,
    waiting: bool,
}

/// インメモリ Room Registry 実装
pub struct InMemoryRoomRegistry {
    /// RoomId -> Room のアリーナ。RoomSlot 内の Mutex が Room 単位の直列化点。
    rooms: Mutex<HashMap<RoomId, RoomSlot>>,
    clock: Arc<dyn Clock>,
    max_rooms: usize,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_max_rooms(clock, DEFAULT_MAX_ROOMS)
    }

    /// Room テーブルの上限を指定して作成（主にテスト用）
    pub fn with_max_rooms(clock: Arc<dyn Clock>, max_rooms: usize) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
            max_rooms,
        }
    }

    /// 現在の Room 数（テスト用）
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }

    async fn entry(&self, room_id: &RoomId) -> Result<Arc<Mutex<Room>>, LobbyError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .map(|slot| slot.room.clone())
            .ok_or(LobbyError::NotFound)
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn create(&self, new_room: NewRoom) -> Result<Room, LobbyError> {
        let mut rooms = self.rooms.lock().await;

        // ホスト重複の検査はテーブルロックの内側で行う。list-then-create の
        // 隙間で同一ホストの create が並走しても片方しか通らない。
        let host_id = &new_room.host.user_id;
        if rooms
            .values()
            .any(|slot| slot.waiting && &slot.host_id == host_id)
        {
            return Err(LobbyError::Conflict(
                "requester is already hosting a waiting room".to_string(),
            ));
        }

        if rooms.len() >= self.max_rooms {
            tracing::warn!("Room table is full ({} rooms), rejecting create", rooms.len());
            return Err(LobbyError::ResourceExhausted);
        }

        // ID 採番。衝突したら再試行し、使い切ったら ResourceExhausted。
        let mut room_id = None;
        for _ in 0..ID_ALLOCATION_ATTEMPTS {
            let candidate = RoomIdFactory::generate();
            if !rooms.contains_key(&candidate) {
                room_id = Some(candidate);
                break;
            }
        }
        let room_id = room_id.ok_or(LobbyError::ResourceExhausted)?;

        let room = Room::with_max_players(
            room_id.clone(),
            new_room.display_name,
            new_room.host,
            new_room.topic_id,
            Timestamp::new(self.clock.now_millis()),
            new_room.max_players,
        );
        rooms.insert(
            room_id,
            RoomSlot {
                room: Arc::new(Mutex::new(room.clone())),
                host_id: room.host_id.clone(),
                waiting: true,
            },
        );

        Ok(room)
    }

    async fn get(&self, room_id: &RoomId) -> Result<Room, LobbyError> {
        let entry = self.entry(room_id).await?;
        let room = entry.lock().await;
        Ok(room.clone())
    }

    async fn list_all(&self) -> Vec<Room> {
        let entries: Vec<Arc<Mutex<Room>>> = {
            let rooms = self.rooms.lock().await;
            rooms.values().map(|slot| slot.room.clone()).collect()
        };

        let mut snapshots = Vec::with_capacity(entries.len());
        for entry in entries {
            let room = entry.lock().await;
            snapshots.push(room.clone());
        }
        snapshots
    }

    async fn mutate(
        &self,
        room_id: &RoomId,
        op: MutateFn,
        after_commit: CommitHook,
    ) -> Result<Room, LobbyError> {
        let entry = self.entry(room_id).await?;
        let mut room = entry.lock().await;

        // Room ロック取得待ちの間に Delete コミットされた可能性があるため
        // 再確認。削除も Room ロック内で行われるので、ここで存在すれば
        // このミューテーションの完了まで消えない。
        {
            let rooms = self.rooms.lock().await;
            if !rooms.contains_key(room_id) {
                return Err(LobbyError::NotFound);
            }
        }

        let commit = op(&mut room)?;
        let snapshot = room.clone();

        {
            let mut rooms = self.rooms.lock().await;
            match commit {
                Commit::Delete => {
                    rooms.remove(room_id);
                }
                Commit::Keep => {
                    if let Some(slot) = rooms.get_mut(room_id) {
                        slot.host_id = snapshot.host_id.clone();
                        slot.waiting = snapshot.status == RoomStatus::Waiting;
                    }
                }
            }
        }

        // Room ロックを保持したままフックを実行する。同一 Room のシグナルが
        // コミット順に並ぶのはこの位置に依存している。
        after_commit(snapshot.clone(), commit).await;

        Ok(snapshot)
    }
}
