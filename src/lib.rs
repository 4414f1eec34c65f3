//! Wine-cellar rack and bottle ledger.
//!
//! Racks are named grids; bottles of a wine sit in one grid cell, in the
//! unsorted bucket, or under a free-text legacy label. The [`Cellar`] keeps
//! the invariant that a cell holds at most one active bottle, drives each
//! bottle through `Active → Consumed | Gifted`, and appends a
//! [`JournalEntry`] for every inventory change in the same atomic commit.
//! [`CellarMap`] is a headless controller for an interactive rack editor
//! and [`api`] exposes the operations as named commands (over HTTP with the
//! `http` feature).

pub mod api;
mod bottle;
mod cellar;
mod config;
mod error;
mod events;
mod journal;
mod location;
pub mod lock;
pub mod map;
pub mod occupancy;
mod rack;
pub mod store;
mod transaction;
mod wine;

pub use bottle::{Bottle, BottleState};
pub use cellar::{Cellar, CellarSnapshot, Occupied};
pub use config::{CellarConfig, DEFAULT_USER_ID};
pub use error::{CellarError, RecordKind, Result, StoreError};
pub use events::CellarEvent;
pub use journal::{JournalEntry, JournalEntryType};
pub use location::{BottleLocation, GridCell, UNKNOWN_RACK_LABEL, UNSORTED_LABEL};
pub use lock::{InMemoryLockManager, LockError, LockManager};
pub use map::{CellarMap, MapView, SlotOutcome};
pub use rack::{Rack, RackType};
pub use store::{Collection, CollectionsExt, InMemoryStore, JsonFileStore, Store, Write};
pub use transaction::CellarTransaction;
pub use wine::{Wine, WineType, UNKNOWN_WINE_LABEL};

#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
