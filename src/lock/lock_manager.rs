use std::sync::Arc;

use super::{Lock, LockError};

/// Hands out one lock per key.
///
/// `QueuedResource` asks for the lock of `<kind>/<id>` around every call, so
/// all callers touching the same resource id queue up behind each other.
pub trait LockManager: Send + Sync {
    type Lock: Lock;

    /// Get (or create) the lock for `key`.
    ///
    /// Repeated calls with the same key must return the same logical lock.
    fn get_lock(&self, key: &str) -> Result<Arc<Self::Lock>, LockError>;

    /// Forget the lock for `key` once its resource is gone. A lock still held
    /// or waited on must be kept.
    fn prune(&self, _key: &str) -> Result<(), LockError> {
        Ok(())
    }
}
