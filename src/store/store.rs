use thiserror::Error;

/// Error type for state store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No value is stored under the key.
    #[error("state not found: {key}")]
    NotFound { key: String },
    /// The stored bytes could not be encoded or decoded.
    #[error("state serialization error: {0}")]
    Serde(String),
    /// The backend failed (I/O, network, quorum loss, ...).
    #[error("state backend error: {0}")]
    Backend(String),
    /// An in-process lock guarding the backend was poisoned.
    #[error("state store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Byte-level key/value storage for resource state.
///
/// Writes are durable once they return `Ok`. Nothing is guaranteed across
/// keys: two writes may land in either order, and a crash between them
/// leaves only the first.
pub trait StateStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn write_raw(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Load the value under `key`. Fails with `StoreError::NotFound` if absent.
    fn read_raw(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn clear(&self, key: &str) -> Result<(), StoreError>;

    /// Every `(key, value)` whose key starts with `prefix`, ordered by key.
    fn read_all_raw(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError>;
}
