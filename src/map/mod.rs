//! Headless cellar-map controller.
//!
//! `CellarMap` holds the state of an interactive rack editor: the search
//! filter, the heatmap and architect toggles, a pending two-phase move and
//! an in-flight drag. Every mutation goes through the [`Cellar`] and is
//! followed by a full reload, so [`CellarMap::view`] always renders what the
//! ledger holds rather than an optimistic guess.

mod view;

use chrono::{Datelike, Utc};

pub use view::{CellOccupant, CellView, DockItem, MapView, RackView, Tint};

use crate::bottle::Bottle;
use crate::cellar::{Cellar, CellarSnapshot};
use crate::error::{CellarError, RecordKind, Result};
use crate::location::{BottleLocation, GridCell};
use crate::lock::{InMemoryLockManager, LockManager};
use crate::rack::{Rack, RackType};
use crate::store::Store;
use crate::wine::Wine;

/// What a click or drop on a cell did.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotOutcome {
    /// The pending or dragged bottle now sits in the cell.
    Moved(Bottle),
    /// The cell is taken; nothing changed and any pending move stays armed.
    Rejected { occupant: String },
    /// No move was pending; the occupied cell is now selected.
    Selected { bottle: Bottle, wine: Option<Wine> },
    /// No move was pending and the cell is vacant.
    Empty(GridCell),
    /// The pending move or drag was dropped back on its own cell.
    Cancelled,
    /// Nothing was being dragged.
    Idle,
}

pub struct CellarMap<S, M = InMemoryLockManager> {
    cellar: Cellar<S, M>,
    snapshot: CellarSnapshot,
    search: String,
    heatmap: bool,
    architect_mode: bool,
    pending_move: Option<String>,
    dragging: Option<String>,
    selected: Option<GridCell>,
    year: i32,
}

impl<S: Store, M: LockManager> CellarMap<S, M> {
    pub fn new(cellar: Cellar<S, M>) -> Result<Self> {
        let snapshot = cellar.snapshot()?;
        Ok(Self {
            cellar,
            snapshot,
            search: String::new(),
            heatmap: false,
            architect_mode: false,
            pending_move: None,
            dragging: None,
            selected: None,
            year: Utc::now().year(),
        })
    }

    /// Pin the year vintages are aged against.
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn cellar(&self) -> &Cellar<S, M> {
        &self.cellar
    }

    pub fn snapshot(&self) -> &CellarSnapshot {
        &self.snapshot
    }

    /// Re-read racks, wines and bottles. Selections pointing at bottles
    /// that are gone or no longer active are dropped.
    pub fn reload(&mut self) -> Result<()> {
        self.snapshot = self.cellar.snapshot()?;
        let live = |id: &Option<String>, snapshot: &CellarSnapshot| {
            id.as_deref()
                .and_then(|id| snapshot.bottle(id))
                .is_some_and(Bottle::is_active)
        };
        if !live(&self.pending_move, &self.snapshot) {
            self.pending_move = None;
        }
        if !live(&self.dragging, &self.snapshot) {
            self.dragging = None;
        }
        if let Some(cell) = &self.selected {
            if self.snapshot.find_bottle_at(cell).is_none() {
                self.selected = None;
            }
        }
        tracing::debug!(
            racks = self.snapshot.racks.len(),
            bottles = self.snapshot.bottles.len(),
            "cellar map reloaded"
        );
        Ok(())
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn heatmap(&self) -> bool {
        self.heatmap
    }

    pub fn toggle_heatmap(&mut self) -> bool {
        self.heatmap = !self.heatmap;
        self.heatmap
    }

    pub fn architect_mode(&self) -> bool {
        self.architect_mode
    }

    pub fn toggle_architect_mode(&mut self) -> bool {
        self.architect_mode = !self.architect_mode;
        self.architect_mode
    }

    pub fn pending_move(&self) -> Option<&str> {
        self.pending_move.as_deref()
    }

    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    pub fn selected(&self) -> Option<&GridCell> {
        self.selected.as_ref()
    }

    /// Arm a two-phase move for an active bottle.
    pub fn start_move(&mut self, bottle_id: &str) -> Result<()> {
        self.active_bottle(bottle_id, "moved")?;
        self.pending_move = Some(bottle_id.to_string());
        self.selected = None;
        Ok(())
    }

    pub fn cancel_move(&mut self) {
        self.pending_move = None;
    }

    pub fn slot_click(&mut self, cell: &GridCell) -> Result<SlotOutcome> {
        let Some(bottle_id) = self.pending_move.clone() else {
            return Ok(match self.snapshot.find_bottle_at(cell) {
                Some(found) => {
                    let outcome = SlotOutcome::Selected {
                        bottle: found.bottle.clone(),
                        wine: found.wine.cloned(),
                    };
                    self.selected = Some(cell.clone());
                    outcome
                }
                None => {
                    self.selected = None;
                    SlotOutcome::Empty(cell.clone())
                }
            });
        };

        let outcome = self.place(&bottle_id, cell)?;
        if !matches!(outcome, SlotOutcome::Rejected { .. }) {
            self.pending_move = None;
        }
        Ok(outcome)
    }

    pub fn drag_start(&mut self, bottle_id: &str) -> Result<()> {
        self.active_bottle(bottle_id, "moved")?;
        self.dragging = Some(bottle_id.to_string());
        Ok(())
    }

    /// Drop the dragged bottle on `cell`, re-checking vacancy first.
    pub fn drop_on(&mut self, cell: &GridCell) -> Result<SlotOutcome> {
        let Some(bottle_id) = self.dragging.take() else {
            return Ok(SlotOutcome::Idle);
        };
        self.place(&bottle_id, cell)
    }

    /// Drop the dragged bottle on the unsorted dock.
    pub fn drop_on_dock(&mut self) -> Result<SlotOutcome> {
        let Some(bottle_id) = self.dragging.take() else {
            return Ok(SlotOutcome::Idle);
        };
        let bottle = self.active_bottle(&bottle_id, "moved")?;
        if bottle.location == BottleLocation::Unsorted {
            return Ok(SlotOutcome::Cancelled);
        }
        let moved = self.cellar.move_bottle(&bottle_id, BottleLocation::Unsorted)?;
        self.reload()?;
        Ok(SlotOutcome::Moved(moved))
    }

    pub fn drag_end(&mut self) {
        self.dragging = None;
    }

    /// Active bottles waiting outside any rack.
    pub fn unsorted_dock(&self) -> Vec<DockItem> {
        view::dock(&self.snapshot)
    }

    pub fn view(&self) -> MapView {
        let pending_cell = self
            .pending_move
            .as_deref()
            .and_then(|id| self.snapshot.bottle(id))
            .and_then(|b| b.location.cell());
        let paint = view::Paint {
            search: &self.search,
            heatmap: self.heatmap,
            year: self.year,
            selected: pending_cell.or(self.selected.as_ref()),
        };
        MapView {
            racks: view::racks(&self.snapshot, &paint),
            dock: view::dock(&self.snapshot),
            search: self.search.clone(),
            heatmap: self.heatmap,
            architect_mode: self.architect_mode,
        }
    }

    pub fn create_rack(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        rack_type: RackType,
    ) -> Result<Rack> {
        let rack = self.cellar.create_rack(name, width, height, rack_type)?;
        self.reload()?;
        Ok(rack)
    }

    pub fn rename_rack(&mut self, rack_id: &str, name: &str) -> Result<bool> {
        self.require_architect("rename a rack")?;
        let renamed = self.cellar.rename_rack(rack_id, name)?;
        self.reload()?;
        Ok(renamed)
    }

    pub fn delete_rack(&mut self, rack_id: &str) -> Result<Vec<String>> {
        self.require_architect("delete a rack")?;
        let relocated = self.cellar.delete_rack(rack_id)?;
        self.reload()?;
        Ok(relocated)
    }

    pub fn fill_rack(&mut self, rack_id: &str, wine_id: &str) -> Result<Vec<Bottle>> {
        let added = self.cellar.fill_rack_with_wine(rack_id, wine_id)?;
        self.reload()?;
        Ok(added)
    }

    pub fn add_bottles(
        &mut self,
        wine_id: &str,
        count: usize,
        location: BottleLocation,
    ) -> Result<Vec<Bottle>> {
        let added = self.cellar.add_bottles(wine_id, count, location)?;
        self.reload()?;
        Ok(added)
    }

    pub fn place_bottle(&mut self, wine_id: &str, cell: GridCell) -> Result<Bottle> {
        let added = self.cellar.add_bottle_at_location(wine_id, cell)?;
        self.reload()?;
        Ok(added)
    }

    pub fn consume_bottle(&mut self, wine_id: &str, bottle_id: &str) -> Result<Bottle> {
        let consumed = self.cellar.consume_specific_bottle(wine_id, bottle_id)?;
        self.reload()?;
        Ok(consumed)
    }

    pub fn gift_bottle(
        &mut self,
        wine_id: &str,
        bottle_id: &str,
        recipient: &str,
        occasion: Option<&str>,
    ) -> Result<Bottle> {
        let gifted = self
            .cellar
            .gift_bottle(wine_id, bottle_id, recipient, occasion)?;
        self.reload()?;
        Ok(gifted)
    }

    fn require_architect(&self, action: &'static str) -> Result<()> {
        if self.architect_mode {
            Ok(())
        } else {
            Err(CellarError::ArchitectModeRequired(action))
        }
    }

    fn active_bottle(&self, bottle_id: &str, action: &'static str) -> Result<&Bottle> {
        let bottle = self
            .snapshot
            .bottle(bottle_id)
            .ok_or_else(|| CellarError::not_found(RecordKind::Bottle, bottle_id))?;
        bottle.ensure_active(action)?;
        Ok(bottle)
    }

    /// Move `bottle_id` into `cell` unless the cell is taken.
    fn place(&mut self, bottle_id: &str, cell: &GridCell) -> Result<SlotOutcome> {
        let bottle = self.active_bottle(bottle_id, "moved")?;
        if bottle.location.cell() == Some(cell) {
            return Ok(SlotOutcome::Cancelled);
        }
        if let Some(found) = self.snapshot.find_bottle_at(cell) {
            tracing::debug!(%cell, occupant = %found.bottle.id, "destination occupied");
            return Ok(SlotOutcome::Rejected {
                occupant: found.bottle.id.clone(),
            });
        }

        match self
            .cellar
            .move_bottle(bottle_id, BottleLocation::Placed(cell.clone()))
        {
            Ok(moved) => {
                self.selected = None;
                self.reload()?;
                Ok(SlotOutcome::Moved(moved))
            }
            Err(CellarError::Conflict { occupant, .. }) => {
                self.reload()?;
                Ok(SlotOutcome::Rejected { occupant })
            }
            Err(e) => Err(e),
        }
    }
}
