//! End-to-end ledger scenarios.

use std::collections::HashSet;

use cellar_map::{
    Bottle, BottleLocation, CellarError, Collection, JournalEntry, JournalEntryType, Rack,
    RackType, Store, Wine, WineType,
};
use serde_json::Value;

use crate::support::{self, cell, CHABLIS, POMEROL};

#[test]
fn two_by_one_fill_then_rejected_move() {
    let (cellar, _) = support::cellar();
    let r1 = cellar.create_rack("R1", 2, 1, RackType::Box).unwrap();

    let placed = cellar.fill_rack_with_wine(&r1.id, CHABLIS).unwrap();
    assert_eq!(placed.len(), 2);
    assert_eq!(placed[0].location, BottleLocation::Placed(cell(&r1, 0, 0)));
    assert_eq!(placed[1].location, BottleLocation::Placed(cell(&r1, 1, 0)));
    assert!(placed.iter().all(|b| b.wine_id == CHABLIS));

    let first = cellar.find_bottle_at(&r1.id, 0, 0).unwrap().unwrap();
    let err = cellar
        .move_bottle(&first.bottle.id, BottleLocation::Placed(cell(&r1, 1, 0)))
        .unwrap_err();
    assert!(matches!(err, CellarError::Conflict { ref occupant, .. } if *occupant == placed[1].id));

    let bottles = cellar.bottles().unwrap();
    assert_eq!(bottles.len(), 2);
    assert_eq!(bottles[0].location, placed[0].location);
    assert_eq!(bottles[1].location, placed[1].location);
    assert_eq!(cellar.journal().unwrap().len(), 1);
}

#[test]
fn deleting_the_rack_unsorts_its_bottles() {
    let (cellar, store) = support::cellar();
    let r1 = cellar.create_rack("R1", 2, 1, RackType::Box).unwrap();
    cellar.fill_rack_with_wine(&r1.id, CHABLIS).unwrap();

    let relocated = cellar.delete_rack(&r1.id).unwrap();
    assert_eq!(relocated.len(), 2);

    let bottles = cellar.bottles().unwrap();
    assert!(bottles
        .iter()
        .all(|b| b.location == BottleLocation::Unsorted));
    assert!(cellar.is_rack_empty(&r1.id).unwrap());

    let raw = store.read(Rack::KEY).unwrap().unwrap();
    let racks: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(racks, serde_json::json!([]));

    let raw = store.read(Bottle::KEY).unwrap().unwrap();
    let bottles: Value = serde_json::from_str(&raw).unwrap();
    assert!(bottles
        .as_array()
        .unwrap()
        .iter()
        .all(|b| b["location"] == "Non trié"));
}

#[test]
fn move_is_visible_to_the_next_lookup() {
    let (cellar, _) = support::cellar();
    let rack = support::rack(&cellar, "Cave", 3, 3);
    let bottle = cellar
        .add_bottle_at_location(POMEROL, cell(&rack, 0, 0))
        .unwrap();

    cellar
        .move_bottle(&bottle.id, BottleLocation::Placed(cell(&rack, 2, 1)))
        .unwrap();
    let found = cellar.find_bottle_at(&rack.id, 2, 1).unwrap().unwrap();
    assert_eq!(found.bottle.id, bottle.id);
    assert_eq!(found.wine.unwrap().name, "Pomerol");
    assert!(cellar.find_bottle_at(&rack.id, 0, 0).unwrap().is_none());
}

#[test]
fn filling_an_empty_rack_uses_every_cell_once() {
    let (cellar, _) = support::cellar();
    let rack = support::rack(&cellar, "Wall", 4, 3);

    let placed = cellar.fill_rack_with_wine(&rack.id, CHABLIS).unwrap();
    assert_eq!(placed.len(), 12);
    let cells: HashSet<_> = placed
        .iter()
        .map(|b| b.location.cell().cloned().unwrap())
        .collect();
    assert_eq!(cells.len(), 12);
    assert!(cells.iter().all(|c| rack.contains(c)));

    let entry = cellar.journal().unwrap().pop().unwrap();
    assert_eq!(entry.entry_type, JournalEntryType::In);
    assert_eq!(entry.quantity, Some(12));
}

#[test]
fn consuming_twice_keeps_one_out_entry() {
    let (cellar, _) = support::cellar();
    let rack = support::rack(&cellar, "Cave", 1, 1);
    let bottle = cellar
        .add_bottle_at_location(CHABLIS, cell(&rack, 0, 0))
        .unwrap();

    cellar.consume_specific_bottle(CHABLIS, &bottle.id).unwrap();
    let err = cellar
        .consume_specific_bottle(CHABLIS, &bottle.id)
        .unwrap_err();
    assert!(matches!(
        err,
        CellarError::InvalidTransition { state: "consumed", .. }
    ));

    let outs: Vec<JournalEntry> = cellar
        .journal()
        .unwrap()
        .into_iter()
        .filter(|e| e.entry_type == JournalEntryType::Out)
        .collect();
    assert_eq!(outs.len(), 1);
    assert_eq!(outs[0].from_location.as_deref(), Some("Cave [1,1]"));
    assert_eq!(outs[0].user_id, "tester");
}

#[test]
fn rejected_operations_write_nothing() {
    let (cellar, store) = support::cellar();
    let rack = support::rack(&cellar, "Cave", 1, 1);
    cellar
        .add_bottle_at_location(CHABLIS, cell(&rack, 0, 0))
        .unwrap();
    let bottles_version = store.version(Bottle::KEY).unwrap();
    let journal_version = store.version(JournalEntry::KEY).unwrap();

    assert!(cellar
        .add_bottle_at_location(POMEROL, cell(&rack, 0, 0))
        .is_err());
    assert!(cellar
        .add_bottle_at_location(POMEROL, cell(&rack, 3, 0))
        .is_err());
    assert!(cellar
        .transact(|tx| {
            tx.add_bottles(POMEROL, 2, BottleLocation::Unsorted)?;
            tx.add_bottle_at_location(POMEROL, cell(&rack, 0, 0))
        })
        .is_err());

    assert_eq!(store.version(Bottle::KEY).unwrap(), bottles_version);
    assert_eq!(store.version(JournalEntry::KEY).unwrap(), journal_version);
    assert_eq!(cellar.bottles().unwrap().len(), 1);
}

#[test]
fn transaction_commits_several_changes_together() {
    let (cellar, _) = support::cellar();
    let rack = support::rack(&cellar, "Cave", 2, 1);

    let moved = cellar
        .transact(|tx| {
            let bottle = tx.add_bottle_at_location(CHABLIS, cell(&rack, 0, 0))?;
            tx.move_bottle(&bottle.id, BottleLocation::Placed(cell(&rack, 1, 0)))
        })
        .unwrap();

    let journal = cellar.journal().unwrap();
    assert_eq!(journal.len(), 2);
    assert_eq!(journal[0].entry_type, JournalEntryType::In);
    assert_eq!(journal[1].entry_type, JournalEntryType::Move);
    assert_eq!(
        cellar.find_bottle_at(&rack.id, 1, 0).unwrap().unwrap().bottle.id,
        moved.id
    );
}

#[test]
fn legacy_records_load_and_render() {
    let (cellar, store) = support::cellar();
    store
        .write(
            Bottle::KEY,
            serde_json::json!([
                {
                    "id": "old-1",
                    "wineId": CHABLIS,
                    "location": "Non trié",
                    "addedByUserId": "someone",
                    "purchaseDate": "2021-06-01T12:00:00Z",
                    "isConsumed": false
                },
                {
                    "id": "old-2",
                    "wineId": "w-gone",
                    "location": "Cave du haut",
                    "addedByUserId": "someone",
                    "purchaseDate": "2021-06-01T12:00:00Z",
                    "isConsumed": false
                }
            ])
            .to_string(),
        )
        .unwrap();

    let bottles = cellar.bottles().unwrap();
    assert_eq!(bottles[0].location, BottleLocation::Unsorted);
    assert_eq!(
        bottles[1].location,
        BottleLocation::LegacyLabel("Cave du haut".into())
    );

    cellar.consume_specific_bottle("w-gone", "old-2").unwrap();
    let entry = cellar.journal().unwrap().pop().unwrap();
    assert_eq!(entry.wine_name, "Vin Inconnu");
    assert_eq!(entry.from_location.as_deref(), Some("Cave du haut"));
}

#[test]
fn unrelated_wine_save_keeps_unknown_types() {
    let (cellar, store) = support::cellar();
    let mut wines: Vec<Value> =
        serde_json::from_str(&store.read(Wine::KEY).unwrap().unwrap()).unwrap();
    wines.push(serde_json::json!({ "id": "s1", "name": "Dassai", "type": "SAKE" }));
    store
        .write(Wine::KEY, Value::Array(wines).to_string())
        .unwrap();

    cellar
        .save_wine(Wine::new("w-new", "Sancerre", WineType::White))
        .unwrap();
    cellar.delete_wine("w-new").unwrap();

    let raw = store.read(Wine::KEY).unwrap().unwrap();
    assert!(raw.contains(r#""type":"SAKE""#), "{raw}");
    assert!(!raw.contains("OTHER"));
    assert_eq!(
        cellar.wine("s1").unwrap().unwrap().wine_type,
        WineType::Other("SAKE".into())
    );
}
