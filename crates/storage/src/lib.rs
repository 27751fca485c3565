//! Storage layer for stronger
//!
//! SQLite-backed persistence behind an r2d2 connection pool. All methods are
//! synchronous; async callers wrap them in `spawn_blocking`.

mod error;
mod migrations;
mod storage;
#[cfg(test)]
mod tests;
mod types;

pub use error::{Result, StorageError};
pub use migrations::SCHEMA_VERSION;
pub use storage::Storage;
pub use types::{ExerciseCount, SetFilter, SiteStats, UserCount};
