//! UserDirectory（外部コラボレーター）の実装
//!
//! ## 実装
//!
//! - `http`: 外部 API から取得する実装（本番想定）
//! - `fixed`: 決定的に合成する実装（ローカル開発・統合テスト）

pub mod fixed;
pub mod http;

pub use fixed::FixedUserDirectory;
pub use http::HttpUserDirectory;
