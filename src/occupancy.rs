//! Occupancy resolver: which active bottle sits in which cell.
//!
//! Locations are soft references, so every answer is derived by scanning the
//! bottle ledger. Only active bottles placed on a grid cell occupy anything;
//! unsorted and legacy-labelled bottles never match.

use std::collections::HashMap;

use crate::bottle::Bottle;
use crate::location::GridCell;
use crate::rack::Rack;
use crate::wine::Wine;

/// An occupied cell's bottle together with its wine, if the wine still exists.
#[derive(Debug, Clone, Copy)]
pub struct Occupant<'a> {
    pub wine: Option<&'a Wine>,
    pub bottle: &'a Bottle,
}

/// The active bottle in `cell`, if any.
pub fn bottle_at<'a>(bottles: &'a [Bottle], cell: &GridCell) -> Option<&'a Bottle> {
    bottles.iter().find(|b| b.occupies(cell))
}

/// The active bottle in `cell` resolved against its wine.
pub fn find_bottle_at<'a>(
    wines: &'a [Wine],
    bottles: &'a [Bottle],
    cell: &GridCell,
) -> Option<Occupant<'a>> {
    bottle_at(bottles, cell).map(|bottle| Occupant {
        wine: wines.iter().find(|w| w.id == bottle.wine_id),
        bottle,
    })
}

/// True iff no active bottle references `rack_id`.
pub fn is_rack_empty(bottles: &[Bottle], rack_id: &str) -> bool {
    occupied_count(bottles, rack_id) == 0
}

pub fn occupied_count(bottles: &[Bottle], rack_id: &str) -> usize {
    bottles
        .iter()
        .filter(|b| b.is_active() && b.location.is_in_rack(rack_id))
        .count()
}

/// Vacant cells of `rack` in row-major order.
pub fn vacant_cells(rack: &Rack, bottles: &[Bottle]) -> Vec<GridCell> {
    let index = OccupancyIndex::build(bottles);
    rack.cells().filter(|cell| !index.is_occupied(cell)).collect()
}

/// Cell → active bottle lookup built once per render instead of one ledger
/// scan per cell.
pub struct OccupancyIndex<'a> {
    cells: HashMap<&'a GridCell, &'a Bottle>,
}

impl<'a> OccupancyIndex<'a> {
    pub fn build(bottles: &'a [Bottle]) -> Self {
        let mut cells = HashMap::new();
        for bottle in bottles.iter().filter(|b| b.is_active()) {
            if let Some(cell) = bottle.location.cell() {
                if let Some(previous) = cells.insert(cell, bottle) {
                    tracing::warn!(
                        cell = %cell,
                        kept = %bottle.id,
                        shadowed = %previous.id,
                        "two active bottles share one cell"
                    );
                }
            }
        }
        Self { cells }
    }

    pub fn get(&self, cell: &GridCell) -> Option<&'a Bottle> {
        self.cells.get(cell).copied()
    }

    pub fn is_occupied(&self, cell: &GridCell) -> bool {
        self.cells.contains_key(cell)
    }
}
