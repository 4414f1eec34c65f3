//! CellarTransaction - one loaded snapshot, one atomic batch commit.
//!
//! The ledger, the rack registry and the journal live in separate
//! collections. A transaction loads them once, lets the cellar operations
//! mutate the in-memory copies, and writes every dirty collection plus the
//! appended journal entries in a single [`Store::write_batch`]. If the
//! operation fails nothing is written, so a journal entry never exists
//! without its ledger change and the other way round.
//!
//! ```ignore
//! cellar.transact(|tx| {
//!     let bottle = tx.add_bottle_at_location("w1", GridCell::new("r1", 0, 0))?;
//!     tx.move_bottle(&bottle.id, BottleLocation::placed("r1", 1, 0))
//! })?;
//! ```

use chrono::{DateTime, Utc};

use crate::bottle::Bottle;
use crate::error::{CellarError, RecordKind, Result, StoreError};
use crate::events::CellarEvent;
use crate::journal::JournalEntry;
use crate::rack::Rack;
use crate::store::{decode, encode, Collection, Store, Write};
use crate::wine::Wine;

#[derive(Default, Debug, Clone, Copy)]
struct Dirty {
    racks: bool,
    bottles: bool,
    wines: bool,
}

pub struct CellarTransaction {
    racks: Vec<Rack>,
    bottles: Vec<Bottle>,
    wines: Vec<Wine>,
    journal: Vec<JournalEntry>,
    events: Vec<CellarEvent>,
    dirty: Dirty,
    user_id: String,
    now: DateTime<Utc>,
}

fn load<C: Collection, S: Store + ?Sized>(store: &S) -> Result<Vec<C>, StoreError> {
    let raw = store.read(C::KEY)?;
    decode(raw.as_deref())
}

impl CellarTransaction {
    /// Load racks, bottles and wines from `store`.
    pub fn begin<S: Store + ?Sized>(store: &S, user_id: &str) -> Result<Self> {
        let tx = Self {
            racks: load(store)?,
            bottles: load(store)?,
            wines: load(store)?,
            journal: Vec::new(),
            events: Vec::new(),
            dirty: Dirty::default(),
            user_id: user_id.to_string(),
            now: Utc::now(),
        };
        tracing::debug!(
            racks = tx.racks.len(),
            bottles = tx.bottles.len(),
            wines = tx.wines.len(),
            "transaction started"
        );
        Ok(tx)
    }

    /// Write every dirty collection and the new journal entries in one batch.
    ///
    /// Returns the queued events for delivery.
    pub fn commit<S: Store + ?Sized>(self, store: &S) -> Result<Vec<CellarEvent>> {
        let mut writes = Vec::new();
        if self.dirty.racks {
            writes.push(Write {
                key: Rack::KEY,
                value: encode(&self.racks)?,
            });
        }
        if self.dirty.bottles {
            writes.push(Write {
                key: Bottle::KEY,
                value: encode(&self.bottles)?,
            });
        }
        if self.dirty.wines {
            writes.push(Write {
                key: Wine::KEY,
                value: encode(&self.wines)?,
            });
        }
        if !self.journal.is_empty() {
            let mut journal: Vec<JournalEntry> = load(store)?;
            journal.extend(self.journal);
            writes.push(Write {
                key: JournalEntry::KEY,
                value: encode(&journal)?,
            });
        }

        if writes.is_empty() {
            tracing::debug!("transaction committed with no changes");
            return Ok(self.events);
        }

        let keys: Vec<&str> = writes.iter().map(|w| w.key).collect();
        tracing::debug!(?keys, "committing transaction");
        store.write_batch(writes)?;
        Ok(self.events)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Timestamp shared by every record written in this transaction.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn racks(&self) -> &[Rack] {
        &self.racks
    }

    pub fn bottles(&self) -> &[Bottle] {
        &self.bottles
    }

    pub fn wines(&self) -> &[Wine] {
        &self.wines
    }

    /// Journal entries appended so far by this transaction.
    pub fn pending_journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    pub(crate) fn racks_mut(&mut self) -> &mut Vec<Rack> {
        self.dirty.racks = true;
        &mut self.racks
    }

    pub(crate) fn bottles_mut(&mut self) -> &mut Vec<Bottle> {
        self.dirty.bottles = true;
        &mut self.bottles
    }

    pub(crate) fn wines_mut(&mut self) -> &mut Vec<Wine> {
        self.dirty.wines = true;
        &mut self.wines
    }

    pub(crate) fn record(&mut self, entry: JournalEntry) {
        self.journal.push(entry);
    }

    pub(crate) fn emit(&mut self, event: CellarEvent) {
        self.events.push(event);
    }

    pub fn rack(&self, rack_id: &str) -> Result<&Rack> {
        self.racks
            .iter()
            .find(|r| r.id == rack_id)
            .ok_or_else(|| CellarError::not_found(RecordKind::Rack, rack_id))
    }

    pub fn wine(&self, wine_id: &str) -> Result<&Wine> {
        self.wines
            .iter()
            .find(|w| w.id == wine_id)
            .ok_or_else(|| CellarError::not_found(RecordKind::Wine, wine_id))
    }

    pub fn bottle(&self, bottle_id: &str) -> Result<&Bottle> {
        self.bottles
            .iter()
            .find(|b| b.id == bottle_id)
            .ok_or_else(|| CellarError::not_found(RecordKind::Bottle, bottle_id))
    }

    pub(crate) fn bottle_index(&self, bottle_id: &str) -> Result<usize> {
        self.bottles
            .iter()
            .position(|b| b.id == bottle_id)
            .ok_or_else(|| CellarError::not_found(RecordKind::Bottle, bottle_id))
    }
}
