use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use super::{Lock, LockError, LockManager};

/// Blocking in-process lock: a held flag plus a condition variable.
///
/// Holding it borrows nothing, so the holder is free to take the store's
/// own locks while the cellar lock is held.
#[derive(Default)]
pub struct InMemoryLock {
    held: Mutex<bool>,
    released: Condvar,
}

impl InMemoryLock {
    pub fn new() -> Self {
        Self::default()
    }

    fn held(&self) -> Result<MutexGuard<'_, bool>, LockError> {
        self.held
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))
    }
}

impl Lock for InMemoryLock {
    fn lock(&self) -> Result<(), LockError> {
        let held = self.held()?;
        let mut held = self
            .released
            .wait_while(held, |held| *held)
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        *held = true;
        Ok(())
    }

    fn try_lock(&self) -> Result<bool, LockError> {
        let mut held = self.held()?;
        let acquired = !*held;
        *held = true;
        Ok(acquired)
    }

    fn unlock(&self) -> Result<(), LockError> {
        let mut held = self.held()?;
        if std::mem::replace(&mut *held, false) {
            self.released.notify_one();
        }
        Ok(())
    }
}

/// Lock manager that lazily creates one `InMemoryLock` per key and returns
/// the same `Arc` for repeated lookups.
#[derive(Default)]
pub struct InMemoryLockManager {
    locks: Mutex<HashMap<String, Arc<InMemoryLock>>>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LockManager for InMemoryLockManager {
    type Lock = InMemoryLock;

    fn get_lock(&self, id: &str) -> Result<Arc<InMemoryLock>, LockError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LockError::Poisoned(format!("lock table poisoned looking up {id}")))?;
        let lock = locks.entry(id.to_string()).or_default();
        Ok(Arc::clone(lock))
    }
}
