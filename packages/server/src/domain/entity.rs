//! ドメイン層のエンティティ定義
//!
//! Room がロビー同期の中心となる集約です。メンバーシップ・ホスト権限・
//! ライフサイクルのルールは全てここのメソッドで強制されます。
//! Registry はルールを持たず、この層のメソッドを `mutate` 経由で呼ぶだけです。

use super::error::LobbyError;
use super::value_object::{MembershipCode, RoomId, Timestamp, TopicId, UserId};

/// Room の最大人数（ゲームの構造的な定数）
pub const DEFAULT_MAX_PLAYERS: usize = 4;

/// ゲーム開始に必要な最低人数
pub const MIN_PLAYERS_TO_START: usize = 2;

/// Room のライフサイクル状態
///
/// `waiting -> started -> finished` の単調遷移のみ。後退はしない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    Waiting,
    Started,
    Finished,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Waiting => "waiting",
            RoomStatus::Started => "started",
            RoomStatus::Finished => "finished",
        }
    }
}

/// Room に参加しているプレイヤー（セッションスコープ）
///
/// `display_name` と `avatar_variant` は表示専用で、挙動には影響しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub user_id: UserId,
    pub display_name: String,
    pub avatar_variant: String,
    pub membership_code: MembershipCode,
}

impl Player {
    pub fn new(user_id: UserId, display_name: String, avatar_variant: String) -> Self {
        Self {
            user_id,
            display_name,
            avatar_variant,
            membership_code: MembershipCode::generate(),
        }
    }
}

/// ロビー同期の対象となる Room エンティティ
///
/// 不変条件:
/// - `members.len() <= max_players`
/// - メンバーの重複なし（1 ユーザー 1 スロット）
/// - `status != waiting` になった後はメンバーシップが凍結される
///
/// members の挿入順がそのままスロット順になる。ホストの表示は
/// `host_id` のみで決まり、スロット位置とは独立している。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub display_name: String,
    pub host_id: UserId,
    pub topic_id: TopicId,
    pub status: RoomStatus,
    pub max_players: usize,
    pub members: Vec<Player>,
    pub created_at: Timestamp,
}

impl Room {
    /// 新しい Room を作成する（作成者が最初のメンバー兼ホスト）
    pub fn new(
        id: RoomId,
        display_name: String,
        host: Player,
        topic_id: TopicId,
        created_at: Timestamp,
    ) -> Self {
        Self::with_max_players(
            id,
            display_name,
            host,
            topic_id,
            created_at,
            DEFAULT_MAX_PLAYERS,
        )
    }

    /// 最大人数を指定して Room を作成する（主にテスト用）
    pub fn with_max_players(
        id: RoomId,
        display_name: String,
        host: Player,
        topic_id: TopicId,
        created_at: Timestamp,
        max_players: usize,
    ) -> Self {
        let host_id = host.user_id.clone();
        Self {
            id,
            display_name,
            host_id,
            topic_id,
            status: RoomStatus::Waiting,
            max_players,
            members: vec![host],
            created_at,
        }
    }

    /// 指定ユーザーがメンバーかどうか
    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.members.iter().any(|p| &p.user_id == user_id)
    }

    /// 指定ユーザーのメンバー情報を取得
    pub fn member(&self, user_id: &UserId) -> Option<&Player> {
        self.members.iter().find(|p| &p.user_id == user_id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// プレイヤーを末尾スロットに追加する
    ///
    /// waiting 以外では容量の有無にかかわらず `RoomNotJoinable`。
    pub fn add_player(&mut self, player: Player) -> Result<(), LobbyError> {
        if self.status != RoomStatus::Waiting {
            return Err(LobbyError::RoomNotJoinable);
        }
        if self.is_member(&player.user_id) {
            return Err(LobbyError::AlreadyMember);
        }
        if self.members.len() >= self.max_players {
            return Err(LobbyError::RoomFull);
        }
        self.members.push(player);
        Ok(())
    }

    /// プレイヤーを取り除く（スロット順は詰める）
    ///
    /// ホストが抜けても `host_id` は自動では付け替えない。明示的な
    /// transfer-host があるまで、抜けたユーザーを参照したままになる。
    pub fn remove_player(&mut self, user_id: &UserId) -> Result<Player, LobbyError> {
        let index = self
            .members
            .iter()
            .position(|p| &p.user_id == user_id)
            .ok_or(LobbyError::NotMember)?;
        Ok(self.members.remove(index))
    }

    /// ホスト権限を target へ移譲する（アトミック）
    pub fn transfer_host(&mut self, requester: &UserId, target: &UserId) -> Result<(), LobbyError> {
        if &self.host_id != requester {
            return Err(LobbyError::Forbidden);
        }
        if !self.is_member(target) {
            return Err(LobbyError::NotMember);
        }
        self.host_id = target.clone();
        Ok(())
    }

    /// ゲームを開始する（waiting -> started、メンバーシップ凍結）
    pub fn start(&mut self, requester: &UserId) -> Result<(), LobbyError> {
        if &self.host_id != requester {
            return Err(LobbyError::Forbidden);
        }
        if self.status != RoomStatus::Waiting {
            return Err(LobbyError::InvalidState);
        }
        if self.members.len() < MIN_PLAYERS_TO_START {
            return Err(LobbyError::NotEnoughPlayers);
        }
        self.status = RoomStatus::Started;
        Ok(())
    }

    /// ゲームを終了する（started -> finished）
    pub fn finish(&mut self, requester: &UserId) -> Result<(), LobbyError> {
        if &self.host_id != requester {
            return Err(LobbyError::Forbidden);
        }
        if self.status != RoomStatus::Started {
            return Err(LobbyError::InvalidState);
        }
        self.status = RoomStatus::Finished;
        Ok(())
    }
}
