//! CollectionRepository - Typed accessor for one collection of a store.

use std::marker::PhantomData;

use super::{decode, encode, Collection, Store};
use crate::error::StoreError;

/// Typed repository wrapper for the collection of `C` records.
pub struct CollectionRepository<'a, S: ?Sized, C> {
    store: &'a S,
    _marker: PhantomData<C>,
}

impl<'a, S: Store + ?Sized, C: Collection> CollectionRepository<'a, S, C> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Load the whole collection.
    pub fn load(&self) -> Result<Vec<C>, StoreError> {
        let raw = self.store.read(C::KEY)?;
        decode(raw.as_deref())
    }

    /// Replace the whole collection.
    pub fn save(&self, items: &[C]) -> Result<(), StoreError> {
        self.store.write(C::KEY, encode(items)?)
    }

    /// Get a record by id.
    pub fn get(&self, id: &str) -> Result<Option<C>, StoreError> {
        Ok(self.load()?.into_iter().find(|item| item.id() == id))
    }

    /// Records matching a predicate, in stored order.
    pub fn find(&self, predicate: &dyn Fn(&C) -> bool) -> Result<Vec<C>, StoreError> {
        Ok(self.load()?.into_iter().filter(|item| predicate(item)).collect())
    }
}

/// Extension trait for typed collection access on any Store.
pub trait CollectionsExt: Store {
    /// Get a typed collection repository.
    fn collection<C: Collection>(&self) -> CollectionRepository<'_, Self, C> {
        CollectionRepository::new(self)
    }
}

impl<S: Store + ?Sized> CollectionsExt for S {}
