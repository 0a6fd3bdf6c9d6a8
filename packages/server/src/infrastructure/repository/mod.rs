//! Registry（データアクセス層）の実装

pub mod inmemory;

pub use inmemory::InMemoryRoomRegistry;
