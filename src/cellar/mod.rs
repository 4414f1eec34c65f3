//! Cellar - the rack registry, bottle ledger and journal behind one service.
//!
//! `Cellar<S, M>` owns a [`Store`] and a [`LockManager`]. Every mutating
//! operation runs through [`Cellar::transact`], which takes the cellar lock,
//! loads the collections, applies the change and commits ledger and journal
//! in one batch. The ledger itself is authoritative: placement into an
//! occupied cell, a move onto another bottle, or consuming a bottle twice
//! are rejected here rather than trusted to callers.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cellar_map::{Cellar, InMemoryStore, RackType, Wine, WineType};
//!
//! let cellar = Cellar::new(InMemoryStore::new());
//! let wine = cellar.save_wine(Wine::new("w1", "Chablis", WineType::White))?;
//! let rack = cellar.create_rack("Cave", 2, 1, RackType::Box)?;
//! let placed = cellar.fill_rack_with_wine(&rack.id, &wine.id)?;
//! assert_eq!(placed.len(), 2);
//! ```

mod bottles;
mod racks;
mod wines;

use std::sync::Arc;

use crate::bottle::Bottle;
use crate::config::{CellarConfig, DEFAULT_USER_ID};
use crate::error::Result;
use crate::journal::JournalEntry;
use crate::location::{BottleLocation, GridCell};
use crate::lock::{InMemoryLockManager, LockGuard, LockManager};
use crate::occupancy;
use crate::rack::{Rack, RackType};
use crate::store::{CollectionsExt, Store};
use crate::transaction::CellarTransaction;
use crate::wine::Wine;

/// Key of the lock guarding the whole cellar.
const CELLAR_LOCK: &str = "cellar";

/// A cell's occupant, owned.
#[derive(Debug, Clone, PartialEq)]
pub struct Occupied {
    pub wine: Option<Wine>,
    pub bottle: Bottle,
}

/// Racks, wines and bottles read together under the cellar lock.
#[derive(Debug, Clone, Default)]
pub struct CellarSnapshot {
    pub racks: Vec<Rack>,
    pub wines: Vec<Wine>,
    pub bottles: Vec<Bottle>,
}

impl CellarSnapshot {
    pub fn rack(&self, rack_id: &str) -> Option<&Rack> {
        self.racks.iter().find(|r| r.id == rack_id)
    }

    pub fn wine(&self, wine_id: &str) -> Option<&Wine> {
        self.wines.iter().find(|w| w.id == wine_id)
    }

    pub fn bottle(&self, bottle_id: &str) -> Option<&Bottle> {
        self.bottles.iter().find(|b| b.id == bottle_id)
    }

    pub fn find_bottle_at(&self, cell: &GridCell) -> Option<occupancy::Occupant<'_>> {
        occupancy::find_bottle_at(&self.wines, &self.bottles, cell)
    }

    /// Active bottles not placed on any rack, in ledger order.
    pub fn off_grid(&self) -> impl Iterator<Item = &Bottle> {
        self.bottles
            .iter()
            .filter(|b| b.is_active() && b.location.is_off_grid())
    }

    pub fn label(&self, location: &BottleLocation) -> String {
        location.label(&self.racks)
    }
}

pub struct Cellar<S, M = InMemoryLockManager> {
    store: Arc<S>,
    locks: Arc<M>,
    user_id: String,
    #[cfg(feature = "emitter")]
    notifier: Arc<crate::events::Notifier>,
}

impl<S, M> Clone for Cellar<S, M> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            locks: self.locks.clone(),
            user_id: self.user_id.clone(),
            #[cfg(feature = "emitter")]
            notifier: self.notifier.clone(),
        }
    }
}

impl<S: Store> Cellar<S, InMemoryLockManager> {
    /// A cellar over `store` guarded by an in-process lock.
    pub fn new(store: S) -> Self {
        Self::with_lock_manager(store, InMemoryLockManager::new())
    }

    pub fn from_config(store: S, config: &CellarConfig) -> Self {
        Self::new(store).with_user(config.default_user_id.clone())
    }
}

impl<S: Store, M: LockManager> Cellar<S, M> {
    pub fn with_lock_manager(store: S, locks: M) -> Self {
        Self {
            store: Arc::new(store),
            locks: Arc::new(locks),
            user_id: DEFAULT_USER_ID.to_string(),
            #[cfg(feature = "emitter")]
            notifier: Arc::new(crate::events::Notifier::new()),
        }
    }

    /// Set the acting user recorded on new bottles and journal entries.
    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// A handle on the same store and lock acting as `user_id`.
    pub fn for_user(&self, user_id: impl Into<String>) -> Self {
        self.clone().with_user(user_id)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a listener called after commits with the event as JSON.
    #[cfg(feature = "emitter")]
    pub fn on<F>(&self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.notifier.on(event, listener);
    }

    /// Run `operation` against a fresh snapshot and commit its changes atomically.
    ///
    /// Nothing is written when `operation` fails.
    pub fn transact<T, F>(&self, operation: F) -> Result<T>
    where
        F: FnOnce(&mut CellarTransaction) -> Result<T>,
    {
        let lock = self.locks.get_lock(CELLAR_LOCK)?;
        let guard = LockGuard::acquire(lock.as_ref())?;

        let mut tx = CellarTransaction::begin(self.store.as_ref(), &self.user_id)?;
        let value = match operation(&mut tx) {
            Ok(value) => value,
            Err(e) => {
                if e.is_rejection() {
                    tracing::warn!(error = %e, user = %self.user_id, "cellar operation rejected");
                } else {
                    tracing::error!(error = %e, user = %self.user_id, "cellar operation failed");
                }
                return Err(e);
            }
        };
        let events = tx.commit(self.store.as_ref())?;
        drop(guard);

        for event in &events {
            tracing::info!(event = event.name(), user = %self.user_id, "cellar change committed");
        }
        #[cfg(feature = "emitter")]
        self.notifier.deliver(&events);

        Ok(value)
    }

    /// Read racks, wines and bottles consistently.
    pub fn snapshot(&self) -> Result<CellarSnapshot> {
        let lock = self.locks.get_lock(CELLAR_LOCK)?;
        let _guard = LockGuard::acquire(lock.as_ref())?;
        Ok(CellarSnapshot {
            racks: self.store.collection::<Rack>().load()?,
            wines: self.store.collection::<Wine>().load()?,
            bottles: self.store.collection::<Bottle>().load()?,
        })
    }

    pub fn racks(&self) -> Result<Vec<Rack>> {
        Ok(self.store.collection::<Rack>().load()?)
    }

    pub fn rack(&self, rack_id: &str) -> Result<Option<Rack>> {
        Ok(self.store.collection::<Rack>().get(rack_id)?)
    }

    pub fn wines(&self) -> Result<Vec<Wine>> {
        Ok(self.store.collection::<Wine>().load()?)
    }

    pub fn wine(&self, wine_id: &str) -> Result<Option<Wine>> {
        Ok(self.store.collection::<Wine>().get(wine_id)?)
    }

    pub fn bottles(&self) -> Result<Vec<Bottle>> {
        Ok(self.store.collection::<Bottle>().load()?)
    }

    pub fn bottle(&self, bottle_id: &str) -> Result<Option<Bottle>> {
        Ok(self.store.collection::<Bottle>().get(bottle_id)?)
    }

    /// Active bottles of one wine, in ledger order.
    pub fn active_bottles(&self, wine_id: &str) -> Result<Vec<Bottle>> {
        Ok(self
            .store
            .collection::<Bottle>()
            .find(&|b| b.wine_id == wine_id && b.is_active())?)
    }

    /// The whole journal in append order.
    pub fn journal(&self) -> Result<Vec<JournalEntry>> {
        Ok(self.store.collection::<JournalEntry>().load()?)
    }

    pub fn journal_for_wine(&self, wine_id: &str) -> Result<Vec<JournalEntry>> {
        Ok(self
            .store
            .collection::<JournalEntry>()
            .find(&|e| e.wine_id.as_deref() == Some(wine_id))?)
    }

    /// The active bottle in `rack_id` at `(x, y)`, with its wine.
    pub fn find_bottle_at(&self, rack_id: &str, x: u32, y: u32) -> Result<Option<Occupied>> {
        let snapshot = self.snapshot()?;
        let cell = GridCell::new(rack_id, x, y);
        Ok(snapshot.find_bottle_at(&cell).map(|found| Occupied {
            wine: found.wine.cloned(),
            bottle: found.bottle.clone(),
        }))
    }

    /// True iff no active bottle references `rack_id`.
    pub fn is_rack_empty(&self, rack_id: &str) -> Result<bool> {
        Ok(occupancy::is_rack_empty(&self.bottles()?, rack_id))
    }

    pub fn create_rack(
        &self,
        name: &str,
        width: u32,
        height: u32,
        rack_type: RackType,
    ) -> Result<Rack> {
        self.transact(|tx| tx.create_rack(name, width, height, rack_type))
    }

    /// Rename a rack. Returns false (and changes nothing) for an unknown id.
    pub fn rename_rack(&self, rack_id: &str, name: &str) -> Result<bool> {
        self.transact(|tx| tx.rename_rack(rack_id, name))
    }

    /// Delete a rack, moving its active bottles to the unsorted bucket.
    ///
    /// Returns the ids of the relocated bottles.
    pub fn delete_rack(&self, rack_id: &str) -> Result<Vec<String>> {
        self.transact(|tx| tx.delete_rack(rack_id))
    }

    pub fn add_bottles(
        &self,
        wine_id: &str,
        count: usize,
        location: BottleLocation,
    ) -> Result<Vec<Bottle>> {
        self.transact(|tx| tx.add_bottles(wine_id, count, location))
    }

    pub fn add_bottle_at_location(&self, wine_id: &str, cell: GridCell) -> Result<Bottle> {
        self.transact(|tx| tx.add_bottle_at_location(wine_id, cell))
    }

    pub fn move_bottle(&self, bottle_id: &str, location: BottleLocation) -> Result<Bottle> {
        self.transact(|tx| tx.move_bottle(bottle_id, location))
    }

    pub fn consume_specific_bottle(&self, wine_id: &str, bottle_id: &str) -> Result<Bottle> {
        self.transact(|tx| tx.consume_specific_bottle(wine_id, bottle_id))
    }

    /// Consume any active bottle of `wine_id`. None if none is left.
    pub fn consume_bottle(&self, wine_id: &str) -> Result<Option<Bottle>> {
        self.transact(|tx| tx.consume_bottle(wine_id))
    }

    pub fn gift_bottle(
        &self,
        wine_id: &str,
        bottle_id: &str,
        recipient: &str,
        occasion: Option<&str>,
    ) -> Result<Bottle> {
        self.transact(|tx| tx.gift_bottle(wine_id, bottle_id, recipient, occasion))
    }

    pub fn fill_rack_with_wine(&self, rack_id: &str, wine_id: &str) -> Result<Vec<Bottle>> {
        self.transact(|tx| tx.fill_rack_with_wine(rack_id, wine_id))
    }

    pub fn save_wine(&self, wine: Wine) -> Result<Wine> {
        self.transact(|tx| tx.save_wine(wine))
    }

    /// Delete a wine together with every one of its bottles.
    pub fn delete_wine(&self, wine_id: &str) -> Result<bool> {
        self.transact(|tx| tx.delete_wine(wine_id))
    }

    pub fn add_note(&self, wine_id: Option<&str>, note: &str) -> Result<JournalEntry> {
        self.transact(|tx| tx.add_note(wine_id, note))
    }
}
