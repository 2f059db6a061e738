//! Disk-backed key/value store.
//!
//! Holds string values under string keys in a single JSON file, in the
//! manner of browser local storage. Every write rewrites the whole file;
//! concurrent writers race and the last one wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::error::DraftError;

/// Configuration for the local store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the store file.
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        // Default to a store file in the current directory
        Self::new("born2ride_store.json")
    }
}

/// String key/value store persisted to one JSON file.
#[derive(Debug, Clone)]
pub struct LocalStore {
    config: StoreConfig,
}

impl LocalStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Read the value stored under `key`.
    ///
    /// A missing store file reads as empty.
    pub fn get_item(&self, key: &str) -> Result<Option<String>, DraftError> {
        let mut items = self.load()?;
        Ok(items.remove(key))
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set_item(&self, key: &str, value: impl Into<String>) -> Result<(), DraftError> {
        let mut items = self.load()?;
        items.insert(key.to_string(), value.into());
        self.write(&items)
    }

    /// Remove `key`. Removing an absent key is not an error.
    pub fn remove_item(&self, key: &str) -> Result<(), DraftError> {
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.write(&items)?;
        }
        Ok(())
    }

    /// Get the store file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, DraftError> {
        let contents = match std::fs::read_to_string(&self.config.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| DraftError::Corrupt {
            location: self.config.path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn write(&self, items: &BTreeMap<String, String>) -> Result<(), DraftError> {
        // Create parent directories if needed
        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(items).map_err(|e| DraftError::Corrupt {
            location: self.config.path.display().to_string(),
            message: e.to_string(),
        })?;

        std::fs::write(&self.config.path, json)?;
        tracing::trace!(path = %self.config.path.display(), keys = items.len(), "store written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn set_get_remove() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(StoreConfig::new(dir.path().join("store.json")));

        assert_eq!(store.get_item("a").unwrap(), None);

        store.set_item("a", "1").unwrap();
        store.set_item("b", "2").unwrap();
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("1"));

        store.remove_item("a").unwrap();
        assert_eq!(store.get_item("a").unwrap(), None);
        assert_eq!(store.get_item("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn last_write_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let first = LocalStore::new(StoreConfig::new(&path));
        let second = LocalStore::new(StoreConfig::new(&path));

        first.set_item("k", "one").unwrap();
        second.set_item("k", "two").unwrap();

        assert_eq!(first.get_item("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn removing_absent_key_is_ok() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(StoreConfig::new(dir.path().join("store.json")));
        store.remove_item("nothing").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("store.json");
        let store = LocalStore::new(StoreConfig::new(&path));

        store.set_item("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();
        let store = LocalStore::new(StoreConfig::new(&path));

        assert!(matches!(
            store.get_item("k"),
            Err(DraftError::Corrupt { .. })
        ));
    }
}
