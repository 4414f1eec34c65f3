//! Locks serialising read-modify-write cycles over the cellar collections.
//!
//! Every mutating cellar operation takes the lock for its cellar key before
//! loading the collections and releases it after the batch commit. The
//! default [`InMemoryLockManager`] covers a single process; other managers
//! can hand out locks backed by files or a database.

mod error;
mod in_memory;
#[allow(clippy::module_inception)]
mod lock;
mod lock_manager;

pub use error::LockError;
pub use in_memory::{InMemoryLock, InMemoryLockManager};
pub use lock::{Lock, LockGuard};
pub use lock_manager::LockManager;
