use super::LockError;

/// A mutual-exclusion primitive that is not tied to a borrow.
pub trait Lock: Send + Sync {
    /// Acquire the lock, blocking until it becomes available.
    fn lock(&self) -> Result<(), LockError>;

    /// `Ok(false)` when someone else holds it.
    fn try_lock(&self) -> Result<bool, LockError>;

    fn unlock(&self) -> Result<(), LockError>;
}

/// Holds a [`Lock`] until dropped.
pub struct LockGuard<'a, L: Lock + ?Sized> {
    lock: &'a L,
}

impl<'a, L: Lock + ?Sized> LockGuard<'a, L> {
    /// Block until `lock` is acquired.
    pub fn acquire(lock: &'a L) -> Result<Self, LockError> {
        lock.lock()?;
        Ok(Self { lock })
    }
}

impl<L: Lock + ?Sized> Drop for LockGuard<'_, L> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.unlock() {
            tracing::error!(error = %e, "failed to release cellar lock");
        }
    }
}
