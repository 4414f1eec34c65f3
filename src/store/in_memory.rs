//! InMemoryStore - HashMap-backed store for tests and embedded use.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{Store, Write};
use crate::error::StoreError;

/// Internal stored representation of a collection.
struct StoredCollection {
    json: String,
    version: u64,
}

/// In-memory store keyed by collection name, shaped like browser local
/// storage. Clone-friendly via Arc: clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    storage: Arc<RwLock<HashMap<String, StoredCollection>>>,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `key` has been written. 0 if never written.
    pub fn version(&self, key: &str) -> Result<u64, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(storage.get(key).map(|s| s.version).unwrap_or(0))
    }
}

impl Store for InMemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(storage.get(key).map(|s| s.json.clone()))
    }

    fn write_batch(&self, writes: Vec<Write>) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;

        for write in writes {
            let version = storage.get(write.key).map(|s| s.version + 1).unwrap_or(1);
            storage.insert(
                write.key.to_string(),
                StoredCollection {
                    json: write.value,
                    version,
                },
            );
        }

        Ok(())
    }
}
