use thiserror::Error;

/// Error type for lock operations.
///
/// The in-memory lock only ever reports `Poisoned`; the other variants are for
/// distributed `Lock` implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// The underlying lock primitive was poisoned (e.g. a thread panicked while holding it).
    #[error("lock poisoned: {0}")]
    Poisoned(String),
    /// Failed to acquire the lock.
    #[error("lock acquire failed: {0}")]
    AcquireFailed(String),
    /// Failed to release the lock.
    #[error("lock release failed: {0}")]
    ReleaseFailed(String),
    /// The lock expired (e.g. a distributed lease elapsed).
    #[error("lock expired: {0}")]
    Expired(String),
}
