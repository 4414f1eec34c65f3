//! Render model derived from one cellar snapshot.

use serde::Serialize;

use crate::bottle::Bottle;
use crate::cellar::CellarSnapshot;
use crate::location::GridCell;
use crate::occupancy::{occupied_count, OccupancyIndex};
use crate::rack::Rack;
use crate::wine::{Wine, WineType};

/// Vintages younger than this many years are `Young`.
const MATURE_AGE: i32 = 5;
/// Vintages at least this old are `Old`.
const OLD_AGE: i32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tint {
    Kind(WineType),
    Favorite,
    Young,
    Mature,
    Old,
    UnknownVintage,
}

impl Tint {
    pub(crate) fn for_wine(wine: Option<&Wine>, heatmap: bool, year: i32) -> Option<Tint> {
        let wine = wine?;
        if !heatmap {
            return Some(Tint::Kind(wine.wine_type.clone()));
        }
        if wine.is_favorite {
            return Some(Tint::Favorite);
        }
        Some(match wine.vintage.map(|v| year.saturating_sub(v)) {
            None => Tint::UnknownVintage,
            Some(age) if age < MATURE_AGE => Tint::Young,
            Some(age) if age < OLD_AGE => Tint::Mature,
            Some(_) => Tint::Old,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellOccupant {
    pub bottle_id: String,
    pub wine_id: String,
    pub wine_name: Option<String>,
    pub vintage: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub cell: GridCell,
    pub occupant: Option<CellOccupant>,
    pub tint: Option<Tint>,
    pub highlighted: bool,
    pub dimmed: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RackView {
    pub rack: Rack,
    /// `rows[y][x]`.
    pub rows: Vec<Vec<CellView>>,
    pub occupied: usize,
    pub capacity: usize,
}

impl RackView {
    pub fn cell(&self, x: u32, y: u32) -> Option<&CellView> {
        self.rows.get(y as usize)?.get(x as usize)
    }
}

/// An off-grid bottle listed in the unsorted dock.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DockItem {
    pub bottle: Bottle,
    pub wine: Option<Wine>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub racks: Vec<RackView>,
    pub dock: Vec<DockItem>,
    pub search: String,
    pub heatmap: bool,
    pub architect_mode: bool,
}

impl MapView {
    pub fn rack(&self, rack_id: &str) -> Option<&RackView> {
        self.racks.iter().find(|r| r.rack.id == rack_id)
    }
}

/// Options that change how cells are painted.
pub(crate) struct Paint<'a> {
    pub search: &'a str,
    pub heatmap: bool,
    pub year: i32,
    pub selected: Option<&'a GridCell>,
}

pub(crate) fn dock(snapshot: &CellarSnapshot) -> Vec<DockItem> {
    snapshot
        .off_grid()
        .map(|bottle| DockItem {
            wine: snapshot.wine(&bottle.wine_id).cloned(),
            label: snapshot.label(&bottle.location),
            bottle: bottle.clone(),
        })
        .collect()
}

pub(crate) fn racks(snapshot: &CellarSnapshot, paint: &Paint<'_>) -> Vec<RackView> {
    let index = OccupancyIndex::build(&snapshot.bottles);
    let searching = !paint.search.trim().is_empty();

    snapshot
        .racks
        .iter()
        .map(|rack| {
            let rows = (0..rack.height)
                .map(|y| {
                    (0..rack.width)
                        .map(|x| {
                            let cell = GridCell::new(rack.id.clone(), x, y);
                            let bottle = index.get(&cell);
                            let wine = bottle.and_then(|b| snapshot.wine(&b.wine_id));
                            let matched = wine.is_some_and(|w| w.matches(paint.search));
                            CellView {
                                occupant: bottle.map(|b| CellOccupant {
                                    bottle_id: b.id.clone(),
                                    wine_id: b.wine_id.clone(),
                                    wine_name: wine.map(|w| w.name.clone()),
                                    vintage: wine.and_then(|w| w.vintage),
                                }),
                                tint: Tint::for_wine(wine, paint.heatmap, paint.year),
                                highlighted: searching && matched,
                                dimmed: searching && bottle.is_some() && !matched,
                                selected: paint.selected == Some(&cell),
                                cell,
                            }
                        })
                        .collect()
                })
                .collect();
            RackView {
                rack: rack.clone(),
                rows,
                occupied: occupied_count(&snapshot.bottles, &rack.id),
                capacity: rack.capacity(),
            }
        })
        .collect()
}
