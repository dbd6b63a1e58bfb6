use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

use super::{Lock, LockError, LockManager};

/// In-memory lock backed by `Mutex<bool>` + `Condvar`.
pub struct InMemoryLock {
    state: Mutex<bool>,
    wake: Condvar,
}

impl InMemoryLock {
    pub fn new() -> Self {
        InMemoryLock {
            state: Mutex::new(false),
            wake: Condvar::new(),
        }
    }
}

impl Default for InMemoryLock {
    fn default() -> Self {
        Self::new()
    }
}

impl Lock for InMemoryLock {
    fn lock(&self) -> Result<(), LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        while *locked {
            locked = self
                .wake
                .wait(locked)
                .map_err(|e| LockError::Poisoned(e.to_string()))?;
        }
        *locked = true;
        Ok(())
    }

    fn try_lock(&self) -> Result<bool, LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        if *locked {
            Ok(false)
        } else {
            *locked = true;
            Ok(true)
        }
    }

    fn unlock(&self) -> Result<(), LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        if *locked {
            *locked = false;
            self.wake.notify_one();
        }
        Ok(())
    }
}

/// In-memory lock manager; lazily creates one `InMemoryLock` per key.
#[derive(Default)]
pub struct InMemoryLockManager {
    locks: Mutex<HashMap<String, Arc<InMemoryLock>>>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys with a live lock entry.
    pub fn len(&self) -> Result<usize, LockError> {
        let locks = self
            .locks
            .lock()
            .map_err(|_| LockError::Poisoned("lock manager map poisoned".into()))?;
        Ok(locks.len())
    }

    pub fn is_empty(&self) -> Result<bool, LockError> {
        Ok(self.len()? == 0)
    }
}

impl LockManager for InMemoryLockManager {
    type Lock = InMemoryLock;

    fn get_lock(&self, key: &str) -> Result<Arc<InMemoryLock>, LockError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LockError::Poisoned("lock manager map poisoned".into()))?;
        Ok(locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(InMemoryLock::new()))
            .clone())
    }

    fn prune(&self, key: &str) -> Result<(), LockError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LockError::Poisoned("lock manager map poisoned".into()))?;
        // Only the map holds it: nobody is inside or queued on this key.
        if locks.get(key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_lock_then_unlock() {
        let lock = InMemoryLock::new();
        assert!(lock.try_lock().unwrap());
        assert!(!lock.try_lock().unwrap());
        lock.unlock().unwrap();
        assert!(lock.try_lock().unwrap());
        lock.unlock().unwrap();
    }

    #[test]
    fn unlock_when_free_is_noop() {
        let lock = InMemoryLock::new();
        lock.unlock().unwrap();
        assert!(lock.try_lock().unwrap());
    }

    #[test]
    fn lock_blocks_until_released() {
        let lock = Arc::new(InMemoryLock::new());
        lock.lock().unwrap();

        let waiter = {
            let lock = Arc::clone(&lock);
            std::thread::spawn(move || {
                lock.lock().unwrap();
                lock.unlock().unwrap();
            })
        };
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert!(!waiter.is_finished());
        lock.unlock().unwrap();
        waiter.join().unwrap();
    }

    #[test]
    fn same_key_returns_same_arc() {
        let manager = InMemoryLockManager::new();
        let a = manager.get_lock("auto-vxlan/default").unwrap();
        let b = manager.get_lock("auto-vxlan/default").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn prune_drops_idle_entry() {
        let manager = InMemoryLockManager::new();
        drop(manager.get_lock("auto-vxlan/gone").unwrap());
        manager.prune("auto-vxlan/gone").unwrap();
        assert!(manager.is_empty().unwrap());
        manager.prune("auto-vxlan/never").unwrap();
    }

    #[test]
    fn prune_keeps_entry_someone_holds() {
        let manager = InMemoryLockManager::new();
        let held = manager.get_lock("auto-vxlan/busy").unwrap();
        manager.prune("auto-vxlan/busy").unwrap();
        assert_eq!(manager.len().unwrap(), 1);
        assert!(Arc::ptr_eq(&held, &manager.get_lock("auto-vxlan/busy").unwrap()));
    }

    #[test]
    fn different_keys_return_different_arcs() {
        let manager = InMemoryLockManager::new();
        let a = manager.get_lock("auto-vxlan/a").unwrap();
        let b = manager.get_lock("auto-vxlan/b").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
