//! インメモリ実装の Registry

pub mod room;

pub use room::InMemoryRoomRegistry;
