//! ドメイン層のエラー定義
//!
//! ロビー操作のエラー分類（taxonomy）をここで一元管理します。
//! 全ての層は構造化された `Result` でエラーを伝搬し、Gateway 境界で
//! チャンネル応答・HTTP ステータスへ変換されます。

use thiserror::Error;

/// 値オブジェクトのバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("value must not be empty")]
    Empty,
    #[error("value exceeds maximum length of {0}")]
    TooLong(usize),
}

/// ロビー操作のエラー分類
///
/// 失敗した操作は Room の状態を一切変更せず、ブロードキャストも行わない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    /// Room またはユーザーが存在しない
    #[error("room not found")]
    NotFound,
    /// 構造的な不変条件に違反する作成要求（例: 既に waiting の Room をホスト中）
    #[error("conflicting room state: {0}")]
    Conflict(String),
    /// 既に同じ Room のメンバーである
    #[error("user is already a member of this room")]
    AlreadyMember,
    /// Room が満員
    #[error("room is full")]
    RoomFull,
    /// Room が waiting 状態ではないため参加できない
    #[error("room is not joinable")]
    RoomNotJoinable,
    /// ホスト専用の操作を非ホストが要求した
    #[error("requester is not allowed to perform this action")]
    Forbidden,
    /// 対象ユーザーが Room のメンバーではない
    #[error("user is not a member of this room")]
    NotMember,
    /// ゲーム開始に必要な人数に満たない
    #[error("not enough players to start")]
    NotEnoughPlayers,
    /// 許可されていない状態遷移
    #[error("invalid room state transition")]
    InvalidState,
    /// ID 割り当てや Room テーブルの容量枯渇
    #[error("resource exhausted")]
    ResourceExhausted,
    /// 外部コラボレーター（ユーザーディレクトリ等）への到達失敗
    #[error("upstream service unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl LobbyError {
    /// ワイヤ上で使うエラーコード名（taxonomy 名）
    pub fn code(&self) -> &'static str {
        match self {
            LobbyError::NotFound => "NotFound",
            LobbyError::Conflict(_) => "Conflict",
            LobbyError::AlreadyMember => "AlreadyMember",
            LobbyError::RoomFull => "RoomFull",
            LobbyError::RoomNotJoinable => "RoomNotJoinable",
            LobbyError::Forbidden => "Forbidden",
            LobbyError::NotMember => "NotMember",
            LobbyError::NotEnoughPlayers => "NotEnoughPlayers",
            LobbyError::InvalidState => "InvalidState",
            LobbyError::ResourceExhausted => "ResourceExhausted",
            LobbyError::UpstreamUnavailable(_) => "UpstreamUnavailable",
        }
    }
}

/// ユーザーディレクトリ（外部コラボレーター）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("user '{0}' not found")]
    NotFound(String),
    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}

impl From<DirectoryError> for LobbyError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound(_) => LobbyError::NotFound,
            DirectoryError::Unavailable(detail) => LobbyError::UpstreamUnavailable(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lobby_error_codes_match_taxonomy() {
        // テスト項目: 各エラーの code() が taxonomy 名と一致する
        assert_eq!(LobbyError::NotFound.code(), "NotFound");
        assert_eq!(LobbyError::RoomFull.code(), "RoomFull");
        assert_eq!(LobbyError::RoomNotJoinable.code(), "RoomNotJoinable");
        assert_eq!(LobbyError::Forbidden.code(), "Forbidden");
        assert_eq!(LobbyError::NotEnoughPlayers.code(), "NotEnoughPlayers");
        assert_eq!(
            LobbyError::UpstreamUnavailable("timeout".to_string()).code(),
            "UpstreamUnavailable"
        );
    }

    #[test]
    fn test_directory_error_maps_to_lobby_error() {
        // テスト項目: DirectoryError が LobbyError に変換される
        // given (前提条件):
        let not_found = DirectoryError::NotFound("alice".to_string());
        let unavailable = DirectoryError::Unavailable("connection refused".to_string());

        // when (操作) / then (期待する結果):
        assert_eq!(LobbyError::from(not_found), LobbyError::NotFound);
        assert_eq!(
            LobbyError::from(unavailable),
            LobbyError::UpstreamUnavailable("connection refused".to_string())
        );
    }
}
