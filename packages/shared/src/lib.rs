//! Shared utilities for the Machiai lobby coordinator binaries.

pub mod logger;
pub mod time;
