//! Bottle locations.
//!
//! On the wire a location is either the string `"Non trié"` (the unsorted
//! bucket), a `{ rackId, x, y }` object, or any other string kept as a
//! legacy free-text label. In Rust every call site matches on
//! [`BottleLocation`] instead of inspecting the JSON shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rack::Rack;

/// Wire value and display label of the unsorted bucket.
pub const UNSORTED_LABEL: &str = "Non trié";

/// Display label for a cell whose rack no longer exists.
pub const UNKNOWN_RACK_LABEL: &str = "Rack Inconnu";

/// A single cell inside a rack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub rack_id: String,
    pub x: u32,
    pub y: u32,
}

impl GridCell {
    pub fn new(rack_id: impl Into<String>, x: u32, y: u32) -> Self {
        Self {
            rack_id: rack_id.into(),
            x,
            y,
        }
    }

    pub fn is_in(&self, rack_id: &str) -> bool {
        self.rack_id == rack_id
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self.rack_id, self.x, self.y)
    }
}

/// Where a bottle currently sits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawLocation", into = "RawLocation")]
pub enum BottleLocation {
    /// Not yet placed on any rack.
    #[default]
    Unsorted,
    Placed(GridCell),
    /// Free text written by older versions of the app.
    LegacyLabel(String),
}

impl BottleLocation {
    pub fn placed(rack_id: impl Into<String>, x: u32, y: u32) -> Self {
        BottleLocation::Placed(GridCell::new(rack_id, x, y))
    }

    pub fn cell(&self) -> Option<&GridCell> {
        match self {
            BottleLocation::Placed(cell) => Some(cell),
            BottleLocation::Unsorted | BottleLocation::LegacyLabel(_) => None,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.cell().is_some()
    }

    /// True for bottles that belong in the unsorted dock.
    pub fn is_off_grid(&self) -> bool {
        !self.is_placed()
    }

    pub fn is_in_rack(&self, rack_id: &str) -> bool {
        self.cell().is_some_and(|cell| cell.is_in(rack_id))
    }

    /// Human readable label, resolving the rack name against `racks`.
    ///
    /// Coordinates are shown 1-based.
    pub fn label(&self, racks: &[Rack]) -> String {
        match self {
            BottleLocation::Unsorted => UNSORTED_LABEL.to_string(),
            BottleLocation::LegacyLabel(text) => text.clone(),
            BottleLocation::Placed(cell) => match racks.iter().find(|r| r.id == cell.rack_id) {
                Some(rack) => format!("{} [{},{}]", rack.name, cell.x + 1, cell.y + 1),
                None => UNKNOWN_RACK_LABEL.to_string(),
            },
        }
    }
}

impl From<GridCell> for BottleLocation {
    fn from(cell: GridCell) -> Self {
        BottleLocation::Placed(cell)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawLocation {
    Cell(GridCell),
    Text(String),
}

impl From<RawLocation> for BottleLocation {
    fn from(raw: RawLocation) -> Self {
        match raw {
            RawLocation::Cell(cell) => BottleLocation::Placed(cell),
            RawLocation::Text(text) if text.is_empty() || text == UNSORTED_LABEL => {
                BottleLocation::Unsorted
            }
            RawLocation::Text(text) => BottleLocation::LegacyLabel(text),
        }
    }
}

impl From<BottleLocation> for RawLocation {
    fn from(location: BottleLocation) -> Self {
        match location {
            BottleLocation::Unsorted => RawLocation::Text(UNSORTED_LABEL.to_string()),
            BottleLocation::Placed(cell) => RawLocation::Cell(cell),
            BottleLocation::LegacyLabel(text) => RawLocation::Text(text),
        }
    }
}
