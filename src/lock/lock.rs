use super::LockError;

/// A single mutual-exclusion lock guarding one resource id.
///
/// The in-memory lock only serializes callers inside one process. A lock
/// backed by etcd leases or consul sessions can serialize several
/// control-plane processes sharing one store. `QueuedResource` only calls
/// `lock` and `unlock`; `try_lock` and the `AcquireFailed`, `ReleaseFailed`
/// and `Expired` errors are the contract for such external implementations.
pub trait Lock: Send + Sync {
    /// Acquire the lock, blocking until it becomes available.
    fn lock(&self) -> Result<(), LockError>;

    /// Try to acquire the lock without blocking.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if already held.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release the lock.
    fn unlock(&self) -> Result<(), LockError>;
}
