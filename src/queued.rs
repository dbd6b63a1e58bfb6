//! QueuedResource - Per-id serialization for concurrent callers.
//!
//! Resources read, modify and write their operational record with no version
//! check, so two interleaved `allocate` calls on one id can both pick the same
//! free bit. Wrapping a resource in `QueuedResource` makes every call take the
//! `<kind>/<id>` lock from a [`LockManager`] first.

use std::sync::Arc;

use tracing::warn;

use crate::error::ResourceError;
use crate::lock::{InMemoryLockManager, Lock, LockManager};
use crate::resource::{Resource, TeardownReport};

pub struct QueuedResource<R, M = InMemoryLockManager> {
    inner: R,
    locks: Arc<M>,
}

impl<R: Resource> QueuedResource<R, InMemoryLockManager> {
    /// Queue behind a fresh in-process lock manager.
    pub fn new(inner: R) -> Self {
        Self::with_lock_manager(inner, Arc::new(InMemoryLockManager::new()))
    }
}

impl<R: Resource, M: LockManager> QueuedResource<R, M> {
    /// Share `locks` with other handles to the same resources.
    pub fn with_lock_manager(inner: R, locks: Arc<M>) -> Self {
        QueuedResource { inner, locks }
    }

    /// Access the inner resource.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn lock_key(&self) -> String {
        format!("{}/{}", self.inner.description(), self.inner.id())
    }

    fn queued<T>(
        &self,
        op: impl FnOnce(&R) -> Result<T, ResourceError>,
    ) -> Result<T, ResourceError> {
        let _held = Held::acquire(&*self.locks, self.lock_key())?;
        op(&self.inner)
    }
}

/// A taken lock, released on drop (including while unwinding).
struct Held<L: Lock> {
    lock: Arc<L>,
    key: String,
}

impl<L: Lock> Held<L> {
    fn acquire<M: LockManager<Lock = L>>(locks: &M, key: String) -> Result<Self, ResourceError> {
        let lock = locks.get_lock(&key)?;
        lock.lock()?;
        Ok(Held { lock, key })
    }
}

impl<L: Lock> Drop for Held<L> {
    fn drop(&mut self) {
        if let Err(err) = self.lock.unlock() {
            warn!(key = %self.key, error = %err, "failed to release resource lock");
        }
    }
}

impl<R: Resource, M: LockManager> Resource for QueuedResource<R, M> {
    type Config = R::Config;
    type Value = R::Value;

    fn id(&self) -> &str {
        self.inner.id()
    }

    fn description(&self) -> &'static str {
        self.inner.description()
    }

    fn init(&mut self, config: R::Config) -> Result<(), ResourceError> {
        let _held = Held::acquire(&*self.locks, self.lock_key())?;
        self.inner.init(config)
    }

    /// Tear down, then drop the id's lock entry if nobody else is using it.
    fn deinit(&self) -> Result<TeardownReport, ResourceError> {
        let report = self.queued(|inner| inner.deinit())?;
        let key = self.lock_key();
        if let Err(err) = self.locks.prune(&key) {
            warn!(key = %key, error = %err, "failed to prune resource lock");
        }
        Ok(report)
    }

    fn allocate(&self) -> Result<R::Value, ResourceError> {
        self.queued(|inner| inner.allocate())
    }

    fn deallocate(&self, value: R::Value) -> Result<(), ResourceError> {
        self.queued(|inner| inner.deallocate(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter {
        next: AtomicUsize,
        explode: AtomicBool,
    }

    impl Resource for Counter {
        type Config = ();
        type Value = usize;

        fn id(&self) -> &str {
            "counter"
        }

        fn description(&self) -> &'static str {
            "test"
        }

        fn init(&mut self, _config: ()) -> Result<(), ResourceError> {
            Ok(())
        }

        fn deinit(&self) -> Result<TeardownReport, ResourceError> {
            Ok(TeardownReport::default())
        }

        fn allocate(&self) -> Result<usize, ResourceError> {
            if self.explode.swap(false, Ordering::SeqCst) {
                panic!("resource blew up mid-call");
            }
            Ok(self.next.fetch_add(1, Ordering::SeqCst))
        }

        fn deallocate(&self, _value: usize) -> Result<(), ResourceError> {
            Ok(())
        }
    }

    #[test]
    fn panic_inside_resource_releases_lock() {
        let locks = Arc::new(InMemoryLockManager::new());
        let queued = QueuedResource::with_lock_manager(Counter::default(), locks.clone());
        queued.inner().explode.store(true, Ordering::SeqCst);

        let outcome = catch_unwind(AssertUnwindSafe(|| queued.allocate()));
        assert!(outcome.is_err());

        let lock = locks.get_lock("test/counter").unwrap();
        assert!(lock.try_lock().unwrap(), "lock left held after panic");
        lock.unlock().unwrap();
        assert_eq!(queued.allocate().unwrap(), 0);
    }

    #[test]
    fn deinit_prunes_lock_entry() {
        let locks = Arc::new(InMemoryLockManager::new());
        let mut queued = QueuedResource::with_lock_manager(Counter::default(), locks.clone());
        queued.init(()).unwrap();
        queued.allocate().unwrap();
        assert_eq!(locks.len().unwrap(), 1);

        queued.deinit().unwrap();
        assert!(locks.is_empty().unwrap());
    }
}
