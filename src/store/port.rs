//! The raw key/value port every backend implements.

use std::sync::Arc;

use crate::error::StoreError;

/// One pending collection write inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    pub key: &'static str,
    pub value: String,
}

/// Raw JSON storage keyed by collection name.
pub trait Store: Send + Sync {
    /// Read the raw JSON stored under `key`. Returns None if never written.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Apply every write or none of them.
    ///
    /// Readers must never observe a state where only part of the batch has
    /// been applied.
    fn write_batch(&self, writes: Vec<Write>) -> Result<(), StoreError>;

    /// Write a single key.
    fn write(&self, key: &'static str, value: String) -> Result<(), StoreError> {
        self.write_batch(vec![Write { key, value }])
    }
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write_batch(&self, writes: Vec<Write>) -> Result<(), StoreError> {
        (**self).write_batch(writes)
    }
}
