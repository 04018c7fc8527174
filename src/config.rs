use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::storage::{MigrationPolicy, SCHEMA_VERSION};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UsersdbConfig {
    pub database: Option<String>,
    pub schema_version: Option<u32>,
    pub migration: Option<MigrationPolicy>,
}

impl UsersdbConfig {
    pub fn database_path(&self, base: &Path) -> PathBuf {
        self.database
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| default_database_path_in(base))
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version.unwrap_or(SCHEMA_VERSION)
    }

    pub fn migration(&self) -> MigrationPolicy {
        self.migration.unwrap_or_default()
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("usersdb.toml")
}

pub fn default_database_path_in(base: &Path) -> PathBuf {
    base.join(".usersdb").join("usersdb.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<UsersdbConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: UsersdbConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &UsersdbConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).unwrap().is_none());
    }

    #[test]
    fn test_config_roundtrip_and_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usersdb.toml");
        let config = UsersdbConfig {
            database: Some("people.db".to_string()),
            schema_version: Some(2),
            migration: Some(MigrationPolicy::DropOnMismatch),
        };

        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());
        write_config(&path, &config, true).unwrap();

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.database_path(dir.path()), PathBuf::from("people.db"));
    }

    #[test]
    fn test_defaults() {
        let config: UsersdbConfig = toml::from_str("migration = \"upgrade-only\"").unwrap();
        assert_eq!(config.schema_version(), SCHEMA_VERSION);
        assert_eq!(config.migration(), MigrationPolicy::UpgradeOnly);
        assert_eq!(
            config.database_path(Path::new("/tmp/p")),
            PathBuf::from("/tmp/p/.usersdb/usersdb.db")
        );
    }
}
