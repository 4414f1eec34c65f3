use serde::{Deserialize, Serialize};

use crate::location::GridCell;
use crate::store::Collection;

/// Physical kind of rack. Only affects presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RackType {
    #[default]
    Shelf,
    Box,
}

/// A named grid of `width` x `height` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rack {
    pub id: String,
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(rename = "type", default)]
    pub rack_type: RackType,
}

impl Rack {
    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, cell: &GridCell) -> bool {
        cell.rack_id == self.id && cell.x < self.width && cell.y < self.height
    }

    /// Every cell in row-major order: `y` outer, `x` inner.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| GridCell::new(self.id.clone(), x, y)))
    }
}

impl Collection for Rack {
    const KEY: &'static str = "vf_racks";

    fn id(&self) -> &str {
        &self.id
    }
}
