//! StateStoreExt - Typed access on top of any byte-level StateStore.

use serde::{de::DeserializeOwned, Serialize};

use super::{StateStore, StoreError};

/// Extension trait adding JSON-encoded typed reads and writes.
///
/// JSON keeps records field-tagged: a reader ignores fields it does not know
/// and defaults the ones marked `#[serde(default)]`, so records survive
/// schema drift between releases.
pub trait StateStoreExt: StateStore {
    fn write_state<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value).map_err(|e| StoreError::Serde(e.to_string()))?;
        self.write_raw(key, bytes)
    }

    fn read_state<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError> {
        let bytes = self.read_raw(key)?;
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Serde(e.to_string()))
    }

    /// Decode every value under `prefix`. One undecodable value fails the call.
    fn read_all_state<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, StoreError> {
        self.read_all_raw(prefix)?
            .into_iter()
            .map(|(key, bytes)| {
                serde_json::from_slice(&bytes)
                    .map_err(|e| StoreError::Serde(format!("{}: {}", key, e)))
            })
            .collect()
    }
}

impl<S: StateStore + ?Sized> StateStoreExt for S {}
