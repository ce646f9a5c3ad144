//! Key-value storage backends.
//!
//! The store persists everything through the `KeyValueStore` trait, a plain
//! string-keyed slot store. Two backends are provided:
//! - `FileStore` — durable, one file per key under a base directory.
//! - `MemStore` — ephemeral in-process map, modelling per-session storage.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::result::Result;

/// Durable key under which the quote list is persisted.
pub const QUOTES_KEY: &str = "dqg_quotes_v1";
/// Durable key under which the selected category filter is persisted.
pub const FILTER_KEY: &str = "dqg_filter_v1";
/// Session key remembering the last-displayed quote.
pub const LAST_QUOTE_KEY: &str = "dqg_last_quote_v1";

/// String-keyed slot storage shared by the durable and session backends.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// A rejected write surfaces as [`StoreError::StorageWrite`].
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Drop the value stored under `key`. Absent keys are not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Durable store keeping one file per key under a base directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .and_then(|()| fs::write(self.path_for(key), value))
            .map_err(|e| StoreError::StorageWrite(e.to_string()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

/// Ephemeral in-memory store, cleared when the owning process ends.
#[derive(Default)]
pub struct MemStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemStore {
    /// Create an empty session store.
    pub fn new() -> Self {
        MemStore::default()
    }
}

impl KeyValueStore for MemStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.slots.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.slots.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn file_store_round_trips_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data"));

        assert_eq!(store.get(QUOTES_KEY).unwrap(), None);
        store.set(QUOTES_KEY, "[1,2,3]").unwrap();
        assert_eq!(store.get(QUOTES_KEY).unwrap().as_deref(), Some("[1,2,3]"));

        store.set(QUOTES_KEY, "[]").unwrap();
        assert_eq!(store.get(QUOTES_KEY).unwrap().as_deref(), Some("[]"));

        store.remove(QUOTES_KEY).unwrap();
        assert_eq!(store.get(QUOTES_KEY).unwrap(), None);
        store.remove(QUOTES_KEY).unwrap();
    }

    #[test]
    fn file_store_surfaces_rejected_writes() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("occupied");
        fs::write(&blocker, "x").unwrap();

        // The base directory path is an existing file, so create_dir_all fails.
        let store = FileStore::new(&blocker);
        match store.set(FILTER_KEY, "all") {
            Err(StoreError::StorageWrite(_)) => {}
            other => panic!("expected StorageWrite, got {:?}", other),
        }
    }

    #[test]
    fn mem_store_round_trips_values() {
        let store = MemStore::new();
        assert_eq!(store.get(LAST_QUOTE_KEY).unwrap(), None);
        store.set(LAST_QUOTE_KEY, "x").unwrap();
        assert_eq!(store.get(LAST_QUOTE_KEY).unwrap().as_deref(), Some("x"));
        store.remove(LAST_QUOTE_KEY).unwrap();
        assert_eq!(store.get(LAST_QUOTE_KEY).unwrap(), None);
    }
}
