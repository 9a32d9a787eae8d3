//! Durable Key/Value Storage
//!
//! The session store never touches a concrete backend directly; it talks to
//! the [`Storage`] trait so tests can inject [`MemoryStorage`] and the binary
//! can persist to disk with [`FileStorage`].
//!
//! Every call is atomic for a single key. Nothing spans several keys.

use crate::error::StorageError;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// String key/value storage
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Keys currently stored, in no particular order
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// In-memory storage, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}

/// JSON-file storage; the whole map is rewritten on every mutation
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileStorage {
    /// Open (or lazily create) storage at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!("Session storage at {}", path.display());
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let data = std::fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let data = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert!(storage.get("a").unwrap().is_none());

        storage.set("a", "1").unwrap();
        storage.set("a", "2").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("2"));

        storage.remove("a").unwrap();
        assert!(storage.get("a").unwrap().is_none());
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn test_file_storage_persists() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("session.json");

        {
            let storage = FileStorage::open(&path).unwrap();
            storage.set("access_token", "T").unwrap();
            storage.set("user_data", r#"{"username":"ana"}"#).unwrap();
        }

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("access_token").unwrap().as_deref(), Some("T"));

        let mut keys = reopened.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["access_token", "user_data"]);

        reopened.remove("access_token").unwrap();
        assert!(reopened.get("access_token").unwrap().is_none());
    }

    #[test]
    fn test_file_storage_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileStorage::open(&path).unwrap();
        assert!(matches!(
            storage.get("access_token"),
            Err(StorageError::Serialization(_))
        ));
    }
}
