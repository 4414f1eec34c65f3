use std::sync::Arc;

use super::{Lock, LockError};

/// Hands out one lock per key.
pub trait LockManager: Send + Sync {
    type Lock: Lock;

    /// Lookups for the same `id` must resolve to the same lock.
    fn get_lock(&self, id: &str) -> Result<Arc<Self::Lock>, LockError>;
}
