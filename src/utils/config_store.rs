//! Local Store - Persisted Client State
//!
//! Key/value storage standing in for browser local storage. Values are strings;
//! structured entries are JSON-encoded by the callers through the typed helpers.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::error::Result;
use crate::helpers::get_or_create_data_dir;

/// File name of the persisted store inside the data directory
pub const STORE_FILE: &str = "local-store.json";

/// Appended to the file name of a store that could not be parsed
pub const CORRUPT_SUFFIX: &str = ".corrupt";

/// String key/value store
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Read and decode a JSON entry. Corrupt entries read as missing.
pub fn load_json<T: DeserializeOwned>(store: &dyn LocalStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Ignoring unreadable stored entry");
            None
        }
    }
}

/// Encode and write a JSON entry
pub fn save_json<T: Serialize>(store: &dyn LocalStore, key: &str, value: &T) -> Result<()> {
    let content = serde_json::to_string(value)?;
    store.set(key, &content)
}

/// Store backed by a single JSON object file
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store in the platform data directory
    pub fn open_default() -> Result<Self> {
        let path = get_or_create_data_dir()?.join(STORE_FILE);
        Self::open(path)
    }

    /// Open (or lazily create) a store at the given path. An unreadable file
    /// is moved aside and the store starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_str(&content) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "Local store is corrupt, starting empty"
                        );
                        set_aside(&path);
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// Keep a corrupt store file next to the original for inspection
fn set_aside(path: &Path) {
    let mut backup = path.as_os_str().to_owned();
    backup.push(CORRUPT_SUFFIX);
    if let Err(e) = fs::rename(path, &backup) {
        warn!(path = %path.display(), error = %e, "Failed to move corrupt local store aside");
    }
}

/// In-memory store, used by tests and `--ephemeral` runs
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(STORE_FILE);

        let store = FileStore::open(&path).expect("open");
        store.set("authToken", "abc").expect("set");
        store.set("userData", "{}").expect("set");
        store.remove("userData").expect("remove");

        let reopened = FileStore::open(&path).expect("reopen");
        assert_eq!(reopened.get("authToken").as_deref(), Some("abc"));
        assert_eq!(reopened.get("userData"), None);
    }

    #[test]
    fn test_corrupt_file_is_set_aside() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(STORE_FILE);
        fs::write(&path, r#"{"authToken": "abc""#).expect("write");

        let store = FileStore::open(&path).expect("open");
        assert_eq!(store.get("authToken"), None);
        let backup = dir.path().join(format!("{STORE_FILE}{CORRUPT_SUFFIX}"));
        assert_eq!(
            fs::read_to_string(&backup).expect("backup"),
            r#"{"authToken": "abc""#
        );

        store.set("authToken", "fresh").expect("set");
        let reopened = FileStore::open(&path).expect("reopen");
        assert_eq!(reopened.get("authToken").as_deref(), Some("fresh"));
    }

    #[test]
    fn test_json_helpers_ignore_corrupt_entries() {
        let store = MemoryStore::new();
        store.set("userData", "{not json").expect("set");
        let loaded: Option<serde_json::Value> = load_json(&store, "userData");
        assert!(loaded.is_none());

        save_json(&store, "userData", &serde_json::json!({"username": "mario"})).expect("save");
        let loaded: Option<serde_json::Value> = load_json(&store, "userData");
        assert_eq!(loaded, Some(serde_json::json!({"username": "mario"})));
    }
}
