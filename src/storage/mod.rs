//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite table:
//! - users(id, name)
//!
//! The schema version is kept in `PRAGMA user_version`.

pub mod schema;
pub mod sqlite;

pub use schema::{MigrationPolicy, SchemaManager, SCHEMA_VERSION};
pub use sqlite::{RecordStore, StoreStats};
