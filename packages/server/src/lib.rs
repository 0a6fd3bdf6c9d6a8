//! Lobby coordination server library.
//!
//! This library provides the authoritative lobby/room coordination service for a
//! turn-based multiplayer board game: room lifecycle, membership, host authority
//! and change-signal fan-out over WebSocket.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
