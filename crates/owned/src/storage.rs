//! Key-value persistence for the owned collection.
//!
//! [`JsonFileStorage`] keeps one `<key>.json` file per key under a directory;
//! [`MemoryStorage`] keeps values in-process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::error::StorageError;

/// Durable key-value storage.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the stored bytes, `None` if nothing was ever written.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

/// File-backed storage, one JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Creates a storage rooted at `dir`. The directory is created on the
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read(&path)?;
        debug!("read {} byte(s) from {:?}", data.len(), path);
        Ok(Some(data))
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        std::fs::write(&path, value)?;
        debug!("wrote {} byte(s) to {:?}", value.len(), path);
        Ok(())
    }
}

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for std::sync::Arc<T> {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}
