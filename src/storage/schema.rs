//! Database schema definitions and version-triggered migration
//!
//! The persisted schema version lives in SQLite's `PRAGMA user_version`.
//! A value of 0 means the file has never been initialized.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use rusqlite::{Connection, TransactionBehavior};
use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Schema version declared by this build
pub const SCHEMA_VERSION: u32 = 1;

/// Highest version `PRAGMA user_version` can hold (a signed 32-bit value)
pub const MAX_SCHEMA_VERSION: u32 = i32::MAX as u32;

/// SQL to create the users table
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT
)
"#;

/// SQL to drop the users table
pub const DROP_USERS_TABLE: &str = "DROP TABLE IF EXISTS users";

/// Name of the record seeded into a freshly created store
pub const SEED_NAME: &str = "Mostapha";

/// What to do when the persisted version differs from the declared one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MigrationPolicy {
    /// Rebuild on upgrade, refuse to open a newer database
    #[default]
    UpgradeOnly,
    /// Rebuild on any mismatch, including downgrades
    DropOnMismatch,
}

impl MigrationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationPolicy::UpgradeOnly => "upgrade-only",
            MigrationPolicy::DropOnMismatch => "drop-on-mismatch",
        }
    }
}

impl FromStr for MigrationPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "upgrade-only" | "upgrade" => Ok(MigrationPolicy::UpgradeOnly),
            "drop-on-mismatch" | "drop" => Ok(MigrationPolicy::DropOnMismatch),
            _ => Err(Error::Validation(format!("unknown migration policy: {}", s))),
        }
    }
}

impl std::fmt::Display for MigrationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the database location and brings every connection up to the
/// declared schema before handing it out.
#[derive(Debug, Clone)]
pub struct SchemaManager {
    path: PathBuf,
    declared_version: u32,
    policy: MigrationPolicy,
}

impl SchemaManager {
    /// Open or create the database file with the default migration policy
    pub fn open(path: impl AsRef<Path>, declared_version: u32) -> Result<Self> {
        Self::open_with_policy(path, declared_version, MigrationPolicy::default())
    }

    /// Open or create the database file.
    ///
    /// Creates missing parent directories and runs creation or migration
    /// immediately, so a bad file or a refused downgrade surfaces here rather
    /// than on the first store call. Repeated opens of the same path are safe.
    pub fn open_with_policy(
        path: impl AsRef<Path>,
        declared_version: u32,
        policy: MigrationPolicy,
    ) -> Result<Self> {
        if declared_version == 0 || declared_version > MAX_SCHEMA_VERSION {
            return Err(Error::InvalidSchemaVersion(declared_version));
        }

        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = Self {
            path,
            declared_version,
            policy,
        };
        manager.connect()?;
        Ok(manager)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn declared_version(&self) -> u32 {
        self.declared_version
    }

    pub fn policy(&self) -> MigrationPolicy {
        self.policy
    }

    /// Open a connection that is guaranteed to see the declared schema.
    ///
    /// The connection closes when dropped.
    pub fn connect(&self) -> Result<Connection> {
        let mut conn = Connection::open(&self.path)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let persisted = read_version(&tx)?;
        if persisted == 0 {
            self.on_create(&tx)?;
            tx.commit()?;
        } else if persisted != self.declared_version {
            self.on_upgrade(&tx, persisted, self.declared_version)?;
            tx.commit()?;
        } else {
            tx.rollback()?;
        }

        Ok(conn)
    }

    /// Version currently stamped in the database file
    pub fn persisted_version(&self) -> Result<u32> {
        let conn = Connection::open(&self.path)?;
        read_version(&conn)
    }

    /// Create the table on a fresh database and seed the default record.
    pub fn on_create(&self, conn: &Connection) -> Result<()> {
        tracing::info!("Creating schema v{} at {}", self.declared_version, self.path.display());
        conn.execute(CREATE_USERS_TABLE, [])?;
        conn.execute("INSERT INTO users (name) VALUES (?1)", [SEED_NAME])?;
        write_version(conn, self.declared_version)
    }

    /// Rebuild the table for a new schema version.
    ///
    /// Existing rows are discarded. Under `UpgradeOnly` a database newer than
    /// the declared version is left untouched and reported as an error.
    pub fn on_upgrade(&self, conn: &Connection, old_version: u32, new_version: u32) -> Result<()> {
        if old_version == new_version {
            return Ok(());
        }

        if new_version < old_version && self.policy == MigrationPolicy::UpgradeOnly {
            tracing::warn!(
                "Refusing to downgrade {} from v{} to v{}",
                self.path.display(),
                old_version,
                new_version
            );
            return Err(Error::UnsupportedSchemaVersion {
                found: old_version,
                supported: new_version,
            });
        }

        tracing::info!(
            "Migrating {} from v{} to v{} (dropping users)",
            self.path.display(),
            old_version,
            new_version
        );
        // Dropping an AUTOINCREMENT table also removes its sqlite_sequence row,
        // so ids restart at 1 in the rebuilt table.
        conn.execute(DROP_USERS_TABLE, [])?;
        conn.execute(CREATE_USERS_TABLE, [])?;
        write_version(conn, new_version)
    }
}

fn read_version(conn: &Connection) -> Result<u32> {
    let version: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

fn write_version(conn: &Connection, version: u32) -> Result<()> {
    conn.pragma_update(None, "user_version", version)?;
    Ok(())
}
