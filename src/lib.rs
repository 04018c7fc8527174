//! # usersdb - Local User Registry
//!
//! A persistent single-table record store kept in sync with an ordered,
//! selectable list view.
//!
//! usersdb provides:
//! - SQLite-backed storage with versioned schema creation and migration
//! - CRUD over `Record`s with explicit found/not-found write outcomes
//! - A list-synchronization controller that tracks the current selection
//!   across mutations and re-renders through a pluggable `Surface`

pub mod record;
pub mod storage;
pub mod sync;
pub mod ui;
pub mod config;
pub mod output;


// Re-exports for convenient access
pub use record::{Record, WriteOutcome};
pub use storage::{MigrationPolicy, RecordStore, SchemaManager};
pub use sync::{ListSyncController, Notice, SelectionState, Surface};

/// Result type alias for usersdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for usersdb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No record selected")]
    NoSelection,

    #[error("Index {index} out of range (list has {len} records)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid schema version: {0} (must be between 1 and 2147483647)")]
    InvalidSchemaVersion(u32),

    #[error("Database schema version {found} is newer than supported version {supported}")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}
