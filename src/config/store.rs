//! Key/value session storage.
//!
//! The editor keeps two keys here: the recoverable canvas session and the
//! persisted history tail. Callers treat every write as best effort.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{CanvasError, Result};

/// String key/value storage.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Deserialize the JSON stored under `key`.
pub fn read_json<T: DeserializeOwned>(store: &dyn SessionStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize `value` as JSON under `key`.
pub fn write_json<T: Serialize + ?Sized>(store: &dyn SessionStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// In-memory store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| CanvasError::Storage("memory store poisoned".to_string()))
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the platform session directory.
    pub fn default_location() -> Result<Self> {
        super::session_dir()
            .map(Self::new)
            .ok_or_else(|| CanvasError::Config("Could not determine session directory".to_string()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| CanvasError::Storage(format!("Failed to read {:?}: {}", path, e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            CanvasError::Storage(format!("Failed to create session directory: {}", e))
        })?;
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .map_err(|e| CanvasError::Storage(format!("Failed to write {:?}: {}", path, e)))?;
        tracing::debug!("Wrote session key {} to {:?}", key, path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .map_err(|e| CanvasError::Storage(format!("Failed to remove {:?}: {}", path, e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session"));

        assert_eq!(store.get("canvas_session").unwrap(), None);
        write_json(&store, "canvas_session", &vec![1, 2, 3]).unwrap();
        let back: Option<Vec<i32>> = read_json(&store, "canvas_session").unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));

        store.remove("canvas_session").unwrap();
        assert_eq!(store.get("canvas_session").unwrap(), None);
        // removing twice is fine
        store.remove("canvas_session").unwrap();
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.set("../escape", "x").unwrap();
        assert!(dir.path().join("___escape.json").exists());
    }

    #[test]
    fn test_read_json_propagates_parse_errors() {
        let store = MemoryStore::new();
        store.set("bad", "{not json").unwrap();
        let result: Result<Option<Vec<i32>>> = read_json(&store, "bad");
        assert!(matches!(result, Err(CanvasError::Serialization(_))));
    }
}
