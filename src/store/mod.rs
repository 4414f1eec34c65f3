//! Store - the persistence port behind the cellar.
//!
//! Each record type lives in one named collection (`vf_racks`, `vf_bottles`,
//! `vf_wines`, `vf_cellar_journal`) stored as a single JSON array, the same
//! layout the browser app keeps in local storage. A [`Store`] only moves raw
//! JSON text per key; typed access goes through [`CollectionsExt`].
//!
//! ## Example
//!
//! ```ignore
//! use cellar_map::{CollectionsExt, InMemoryStore, Rack};
//!
//! let store = InMemoryStore::new();
//! store.collection::<Rack>().save(&racks)?;
//! let loaded = store.collection::<Rack>().load()?;
//! ```

mod collection_repository;
mod file;
mod in_memory;
mod port;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::StoreError;

/// A record type persisted as one JSON array under [`Collection::KEY`].
pub trait Collection: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Storage key of the whole collection (e.g. `"vf_racks"`).
    const KEY: &'static str;

    /// Returns the unique identifier of this record.
    fn id(&self) -> &str;
}

/// Decode a persisted collection. A missing key is an empty collection.
pub fn decode<C: Collection>(raw: Option<&str>) -> Result<Vec<C>, StoreError> {
    match raw {
        None => Ok(Vec::new()),
        Some(text) if text.trim().is_empty() => Ok(Vec::new()),
        Some(text) => serde_json::from_str(text).map_err(|e| StoreError::Serde {
            key: C::KEY.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Encode a collection into its wire form.
pub fn encode<C: Collection>(items: &[C]) -> Result<String, StoreError> {
    serde_json::to_string(items).map_err(|e| StoreError::Serde {
        key: C::KEY.to_string(),
        message: e.to_string(),
    })
}

pub use collection_repository::{CollectionRepository, CollectionsExt};
pub use file::JsonFileStore;
pub use in_memory::InMemoryStore;
pub use port::{Store, Write};
