//! ドメイン層の値オブジェクト定義
//!
//! ID 類は全て newtype で包み、生成時にバリデーションを行います。
//! 外部から受け取った文字列はこの層を通してのみドメインに入ります。

use uuid::Uuid;

use super::error::ValidationError;

/// 値オブジェクトの最大長（ID・コード共通）
const MAX_ID_LENGTH: usize = 64;

fn validate_id(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    if value.len() > MAX_ID_LENGTH {
        return Err(ValidationError::TooLong(MAX_ID_LENGTH));
    }
    Ok(())
}

/// Room の識別子（作成時に割り当て、不変）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        validate_id(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// RoomId を生成するファクトリ
///
/// UUID v4 の先頭 8 文字（大文字）を Room コードとして使う。
/// 衝突時の再試行は Registry 側の責務。
pub struct RoomIdFactory;

impl RoomIdFactory {
    pub fn generate() -> RoomId {
        let code = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        RoomId(code)
    }
}

/// ユーザーの安定した外部識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        validate_id(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// 外部所有のゲームコンテンツ（トピック）への参照
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicId(String);

impl TopicId {
    pub fn new(value: String) -> Result<Self, ValidationError> {
        validate_id(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// リアルタイム接続（チャンネル）の識別子
///
/// 接続確立時にサーバー側で採番する。クライアントには渡らない。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// (user, room) ごとに発行される参加トークン
///
/// 再接続時にメンバーシップの継続を証明するために使う。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MembershipCode(String);

impl MembershipCode {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unix タイムスタンプ（ミリ秒）の値オブジェクト
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
