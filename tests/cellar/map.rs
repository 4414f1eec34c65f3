//! Cellar-map controller flows.

use cellar_map::map::{CellView, Tint};
use cellar_map::{BottleLocation, CellarMap, InMemoryStore, SlotOutcome, WineType};

use crate::support::{self, cell, CHABLIS, POMEROL, PORT};

fn map() -> CellarMap<InMemoryStore> {
    let (cellar, _) = support::cellar();
    CellarMap::new(cellar).unwrap().with_year(2025)
}

fn cell_view(map: &CellarMap<InMemoryStore>, rack: usize, x: u32, y: u32) -> CellView {
    map.view().racks[rack].cell(x, y).cloned().unwrap()
}

#[test]
fn pending_move_refuses_occupied_cells() {
    let mut map = map();
    let rack = map.create_rack("R1", 2, 1, cellar_map::RackType::Box).unwrap();
    let placed = map.fill_rack(&rack.id, CHABLIS).unwrap();

    map.start_move(&placed[0].id).unwrap();
    let outcome = map.slot_click(&cell(&rack, 1, 0)).unwrap();
    assert_eq!(
        outcome,
        SlotOutcome::Rejected {
            occupant: placed[1].id.clone()
        }
    );
    assert_eq!(map.pending_move(), Some(placed[0].id.as_str()));

    let bottles = map.cellar().bottles().unwrap();
    assert_eq!(bottles[0].location, placed[0].location);
    assert_eq!(bottles[1].location, placed[1].location);
    assert_eq!(map.cellar().journal().unwrap().len(), 1);
}

#[test]
fn pending_move_lands_on_empty_cell() {
    let mut map = map();
    let rack = map.create_rack("R1", 3, 1, cellar_map::RackType::Box).unwrap();
    let bottle = map.place_bottle(POMEROL, cell(&rack, 0, 0)).unwrap();

    map.start_move(&bottle.id).unwrap();
    assert!(cell_view(&map, 0, 0, 0).selected);

    match map.slot_click(&cell(&rack, 2, 0)).unwrap() {
        SlotOutcome::Moved(moved) => assert_eq!(moved.id, bottle.id),
        other => panic!("unexpected {other:?}"),
    }
    assert!(map.pending_move().is_none());
    assert!(cell_view(&map, 0, 0, 0).occupant.is_none());
    assert_eq!(
        cell_view(&map, 0, 2, 0).occupant.unwrap().bottle_id,
        bottle.id
    );
}

#[test]
fn drag_and_drop_rechecks_vacancy() {
    let mut map = map();
    let rack = map.create_rack("R1", 2, 1, cellar_map::RackType::Shelf).unwrap();
    let a = map.place_bottle(CHABLIS, cell(&rack, 0, 0)).unwrap();
    let loose = map
        .add_bottles(PORT, 1, BottleLocation::Unsorted)
        .unwrap()
        .remove(0);

    map.drag_start(&loose.id).unwrap();
    assert!(matches!(
        map.drop_on(&cell(&rack, 0, 0)).unwrap(),
        SlotOutcome::Rejected { ref occupant } if *occupant == a.id
    ));
    assert!(map.dragging().is_none());

    map.drag_start(&loose.id).unwrap();
    assert!(matches!(
        map.drop_on(&cell(&rack, 1, 0)).unwrap(),
        SlotOutcome::Moved(_)
    ));
    assert!(map.unsorted_dock().is_empty());
    assert_eq!(map.view().racks[0].occupied, 2);
    assert_eq!(map.drop_on(&cell(&rack, 1, 0)).unwrap(), SlotOutcome::Idle);
}

#[test]
fn search_highlights_and_dims_occupied_cells() {
    let mut map = map();
    let rack = map.create_rack("R1", 3, 1, cellar_map::RackType::Shelf).unwrap();
    map.place_bottle(CHABLIS, cell(&rack, 0, 0)).unwrap();
    map.place_bottle(POMEROL, cell(&rack, 1, 0)).unwrap();

    map.set_search("chab");
    let view = map.view();
    let row = &view.racks[0].rows[0];
    assert!(row[0].highlighted && !row[0].dimmed);
    assert!(row[1].dimmed && !row[1].highlighted);
    assert!(!row[2].dimmed && !row[2].highlighted);

    map.set_search("2005");
    assert!(cell_view(&map, 0, 1, 0).highlighted);

    map.set_search("");
    let view = map.view();
    assert!(view.racks[0].rows[0].iter().all(|c| !c.dimmed && !c.highlighted));
}

#[test]
fn heatmap_switches_tints() {
    let mut map = map();
    let rack = map.create_rack("R1", 3, 1, cellar_map::RackType::Shelf).unwrap();
    map.place_bottle(CHABLIS, cell(&rack, 0, 0)).unwrap();
    map.place_bottle(POMEROL, cell(&rack, 1, 0)).unwrap();
    map.place_bottle(PORT, cell(&rack, 2, 0)).unwrap();

    let tints = |map: &CellarMap<InMemoryStore>| -> Vec<Option<Tint>> {
        map.view().racks[0].rows[0].iter().map(|c| c.tint.clone()).collect()
    };

    assert_eq!(
        tints(&map),
        vec![
            Some(Tint::Kind(WineType::White)),
            Some(Tint::Kind(WineType::Red)),
            Some(Tint::Kind(WineType::Sweet)),
        ]
    );
    assert!(map.toggle_heatmap());
    assert_eq!(
        tints(&map),
        vec![
            Some(Tint::Mature),
            Some(Tint::Favorite),
            Some(Tint::UnknownVintage),
        ]
    );
}

#[test]
fn dock_lists_unsorted_and_legacy_bottles() {
    let mut map = map();
    map.add_bottles(CHABLIS, 2, BottleLocation::Unsorted).unwrap();
    map.add_bottles(PORT, 1, BottleLocation::LegacyLabel("Garage".into()))
        .unwrap();
    let consumed = map.cellar().consume_bottle(CHABLIS).unwrap().unwrap();
    map.reload().unwrap();

    let dock = map.unsorted_dock();
    assert_eq!(dock.len(), 2);
    assert!(dock.iter().all(|item| item.bottle.id != consumed.id));
    assert_eq!(dock[1].label, "Garage");
    assert_eq!(dock[1].wine.as_ref().unwrap().name, "Vintage Port");
}

#[test]
fn deleting_a_rack_in_architect_mode_fills_the_dock() {
    let mut map = map();
    let rack = map.create_rack("R1", 2, 1, cellar_map::RackType::Box).unwrap();
    map.fill_rack(&rack.id, CHABLIS).unwrap();

    map.toggle_architect_mode();
    let relocated = map.delete_rack(&rack.id).unwrap();
    assert_eq!(relocated.len(), 2);
    let view = map.view();
    assert!(view.racks.is_empty());
    assert_eq!(view.dock.len(), 2);
    assert!(view.dock.iter().all(|d| d.label == "Non trié"));
}
