//! SQLite storage implementation

use std::path::{Path, PathBuf};
use rusqlite::{params, OptionalExtension};
use crate::Result;
use crate::record::{Record, WriteOutcome};
use super::schema::{MigrationPolicy, SchemaManager};

/// SQLite-backed storage for user records.
///
/// Holds no connection between calls: every operation opens one through the
/// `SchemaManager` and drops it before returning.
#[derive(Debug, Clone)]
pub struct RecordStore {
    schema: SchemaManager,
}

impl RecordStore {
    pub fn new(schema: SchemaManager) -> Self {
        Self { schema }
    }

    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path, declared_version: u32) -> Result<Self> {
        Ok(Self::new(SchemaManager::open(path, declared_version)?))
    }

    /// Open a database file with an explicit migration policy
    pub fn open_with_policy(path: &Path, declared_version: u32, policy: MigrationPolicy) -> Result<Self> {
        Ok(Self::new(SchemaManager::open_with_policy(path, declared_version, policy)?))
    }

    pub fn schema(&self) -> &SchemaManager {
        &self.schema
    }

    // ========== Record Operations ==========

    /// Insert a new record and return it with its assigned id
    pub fn create(&self, name: &str) -> Result<Record> {
        let conn = self.schema.connect()?;
        conn.execute("INSERT INTO users (name) VALUES (?1)", [name])?;
        let id = conn.last_insert_rowid();
        tracing::info!("Created record {} ({:?})", id, name);
        Ok(Record::new(id, name))
    }

    /// Get every record, ascending by id
    pub fn read_all(&self) -> Result<Vec<Record>> {
        let conn = self.schema.connect()?;
        let mut stmt = conn.prepare("SELECT id, name FROM users ORDER BY id ASC")?;

        let records = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!("Read {} records", records.len());
        Ok(records)
    }

    /// Get a record by id
    pub fn get(&self, id: i64) -> Result<Option<Record>> {
        let conn = self.schema.connect()?;
        conn.query_row("SELECT id, name FROM users WHERE id = ?1", [id], row_to_record)
            .optional()
            .map_err(Into::into)
    }

    /// Rewrite the name of the record with `id`
    pub fn update(&self, id: i64, name: &str) -> Result<WriteOutcome> {
        let conn = self.schema.connect()?;
        let affected = conn.execute("UPDATE users SET name = ?1 WHERE id = ?2", params![name, id])?;
        let outcome = WriteOutcome::from_affected(affected);
        tracing::debug!("Update of record {}: {}", id, outcome.as_str());
        Ok(outcome)
    }

    /// Delete the record with `id`
    pub fn delete(&self, id: i64) -> Result<WriteOutcome> {
        let conn = self.schema.connect()?;
        let affected = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
        let outcome = WriteOutcome::from_affected(affected);
        tracing::debug!("Delete of record {}: {}", id, outcome.as_str());
        Ok(outcome)
    }

    /// Count all records
    pub fn count(&self) -> Result<usize> {
        let conn = self.schema.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.schema.connect()?;
        let (records, max_id): (i64, Option<i64>) =
            conn.query_row("SELECT COUNT(*), MAX(id) FROM users", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;
        let schema_version: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        Ok(StoreStats {
            path: self.schema.path().to_path_buf(),
            records: records as usize,
            max_id,
            schema_version,
            policy: self.schema.policy(),
        })
    }
}

/// NULL names read back as the empty string
fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<Record> {
    let name: Option<String> = row.get(1)?;
    Ok(Record {
        id: row.get(0)?,
        name: name.unwrap_or_default(),
    })
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub path: PathBuf,
    pub records: usize,
    pub max_id: Option<i64>,
    pub schema_version: u32,
    pub policy: MigrationPolicy,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Path: {}", self.path.display())?;
        writeln!(f, "  Records: {}", self.records)?;
        match self.max_id {
            Some(id) => writeln!(f, "  Highest id: {}", id)?,
            None => writeln!(f, "  Highest id: -")?,
        }
        writeln!(f, "  Schema version: {}", self.schema_version)?;
        write!(f, "  Migration policy: {}", self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::SCHEMA_VERSION;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, RecordStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(&dir.path().join("usersdb.db"), SCHEMA_VERSION).unwrap();
        (dir, store)
    }

    #[test]
    fn test_seeded_store() {
        let (_dir, store) = open_store();
        assert_eq!(store.read_all().unwrap(), vec![Record::new(1, "Mostapha")]);
    }

    #[test]
    fn test_create_assigns_next_id() {
        let (_dir, store) = open_store();

        let amine = store.create("Amine").unwrap();
        assert_eq!(amine, Record::new(2, "Amine"));

        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1], amine);
    }

    #[test]
    fn test_create_accepts_empty_name() {
        let (_dir, store) = open_store();
        let blank = store.create("").unwrap();
        assert_eq!(store.get(blank.id).unwrap().unwrap().name, "");
    }

    #[test]
    fn test_ids_never_reused() {
        let (_dir, store) = open_store();
        let a = store.create("a").unwrap();
        store.delete(a.id).unwrap();
        let b = store.create("b").unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn test_update_only_matching_row() {
        let (_dir, store) = open_store();
        store.create("Amine").unwrap();

        let outcome = store.update(1, "Mostapha Updated").unwrap();
        assert_eq!(outcome, WriteOutcome::Applied);

        let all = store.read_all().unwrap();
        assert_eq!(all[0], Record::new(1, "Mostapha Updated"));
        assert_eq!(all[1], Record::new(2, "Amine"));
    }

    #[test]
    fn test_update_missing_id() {
        let (_dir, store) = open_store();
        let before = store.read_all().unwrap();

        assert_eq!(store.update(42, "ghost").unwrap(), WriteOutcome::NotFound);
        assert_eq!(store.read_all().unwrap(), before);
    }

    #[test]
    fn test_delete_twice() {
        let (_dir, store) = open_store();
        store.create("Amine").unwrap();

        assert_eq!(store.delete(1).unwrap(), WriteOutcome::Applied);
        assert_eq!(store.delete(1).unwrap(), WriteOutcome::NotFound);

        let all = store.read_all().unwrap();
        assert!(all.iter().all(|r| r.id != 1));
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_null_name_reads_as_empty() {
        let (_dir, store) = open_store();
        {
            let conn = store.schema().connect().unwrap();
            conn.execute("INSERT INTO users (name) VALUES (NULL)", []).unwrap();
        }
        let all = store.read_all().unwrap();
        assert_eq!(all[1].name, "");
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usersdb.db");

        RecordStore::open(&path, SCHEMA_VERSION).unwrap().create("Amine").unwrap();
        let reopened = RecordStore::open(&path, SCHEMA_VERSION).unwrap();
        assert_eq!(reopened.count().unwrap(), 2);
    }

    #[test]
    fn test_migration_empties_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usersdb.db");

        let v1 = RecordStore::open(&path, 1).unwrap();
        v1.create("Amine").unwrap();
        v1.create("Sara").unwrap();

        let v2 = RecordStore::open(&path, 2).unwrap();
        let stats = v2.stats().unwrap();
        assert_eq!(stats.records, 0);
        assert_eq!(stats.max_id, None);
        assert_eq!(stats.schema_version, 2);
    }

    #[test]
    fn test_unstorable_version_does_not_reseed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usersdb.db");

        assert!(RecordStore::open(&path, 2_147_483_648).is_err());

        let store = RecordStore::open(&path, SCHEMA_VERSION).unwrap();
        for _ in 0..3 {
            store.count().unwrap();
        }
        assert_eq!(store.read_all().unwrap(), vec![Record::new(1, "Mostapha")]);
    }

    #[test]
    fn test_stats() {
        let (_dir, store) = open_store();
        store.create("Amine").unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.records, 2);
        assert_eq!(stats.max_id, Some(2));
        assert_eq!(stats.schema_version, SCHEMA_VERSION);
        assert!(stats.to_string().contains("Records: 2"));
    }
}
