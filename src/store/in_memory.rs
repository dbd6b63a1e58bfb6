//! InMemoryStateStore - BTreeMap-backed state store for testing and development.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use super::{StateStore, StoreError};

/// In-memory state store.
///
/// Clone-friendly (cloning shares the same underlying storage). Keys are kept
/// ordered so prefix listings come back sorted.
#[derive(Clone, Default)]
pub struct InMemoryStateStore {
    storage: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> Result<usize, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    pub fn contains(&self, key: &str) -> Result<bool, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("contains"))?;
        Ok(storage.contains_key(key))
    }
}

impl StateStore for InMemoryStateStore {
    fn write_raw(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        storage.insert(key.to_string(), value);
        Ok(())
    }

    fn read_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        storage.get(key).cloned().ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("clear"))?;
        storage.remove(key);
        Ok(())
    }

    fn read_all_raw(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read all"))?;
        Ok(storage
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
