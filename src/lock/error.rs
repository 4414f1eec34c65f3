use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// A thread panicked while holding the primitive behind the lock.
    #[error("lock poisoned: {0}")]
    Poisoned(String),
    /// A lock backed by something other than process memory is unavailable.
    #[error("lock unavailable: {0}")]
    Unavailable(String),
}
