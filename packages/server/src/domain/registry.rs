//! RoomRegistry trait 定義
//!
//! ドメイン層が必要とする Room ストアへのインターフェース。
//! UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には
//! 依存しない（依存性の逆転）。
//!
//! Registry は格納と直列化のみを担い、メンバーシップ等のビジネスルールは
//! `mutate` に渡されるクロージャ（エンティティのメソッド呼び出し）が
//! 強制する。削除もクロージャが `Commit::Delete` を返すことで行い、
//! 同一 Room のミューテーション全順序に参加する。独立した delete 経路は
//! 存在しないため、進行中のミューテーションを追い越して Room が消える
//! ことはない。

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use super::entity::{Player, Room};
use super::error::LobbyError;
use super::value_object::{RoomId, TopicId};

/// Room 作成の入力（ID とタイムスタンプは Registry が採番する）
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub display_name: String,
    pub host: Player,
    pub topic_id: TopicId,
    pub max_players: usize,
}

/// `mutate` 成功時の Room の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Room を保持する
    Keep,
    /// Room をテーブルから取り除く
    Delete,
}

/// `mutate` に渡す変換クロージャ
///
/// Err を返した場合は Room の状態を一切変更してはならない
/// （エンティティのメソッドはこの規約を守っている）。
pub type MutateFn = Box<dyn FnOnce(&mut Room) -> Result<Commit, LobbyError> + Send>;

/// コミット直後に Room の直列化区間の内側で await されるフック
///
/// 同一 Room の次のミューテーションはこのフックの完了まで開始されない
/// ため、フック内で配信したシグナルはコミット順に並ぶ。
pub type CommitHook = Box<dyn FnOnce(Room, Commit) -> BoxFuture<'static, ()> + Send>;

/// Room Registry trait
///
/// 同一 Room に対する `mutate`（削除コミットを含む）は直列化される。
/// 読み取りはミューテーションと並行してよいが、常に非破断
/// （non-torn）なスナップショットを返す。
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Room を新規作成し、スナップショットを返す
    ///
    /// ホスト重複の検査はテーブルロックの内側で行う。失敗するのは
    /// 同一ホストが既に waiting の Room を持つ場合（`Conflict`）と、
    /// ID 割り当てやテーブル容量の枯渇（`ResourceExhausted`）のみ。
    async fn create(&self, new_room: NewRoom) -> Result<Room, LobbyError>;

    /// Room のスナップショットを取得
    async fn get(&self, room_id: &RoomId) -> Result<Room, LobbyError>;

    /// 全 Room のスナップショット一覧を取得（順序は規定しない）
    async fn list_all(&self) -> Vec<Room>;

    /// Room にアトミックな変換を適用し、変換直後のスナップショットを返す
    ///
    /// 同一 Room への mutate 同士は決して交錯しない。クロージャが
    /// `Commit::Delete` を返した場合、同じ直列化区間の中で Room を
    /// テーブルから取り除く。`after_commit` はコミット反映後、
    /// 直列化区間を抜ける前に await される。
    async fn mutate(
        &self,
        room_id: &RoomId,
        op: MutateFn,
        after_commit: CommitHook,
    ) -> Result<Room, LobbyError>;
}
