//! The ledger over `JsonFileStore`.

use cellar_map::{
    BottleLocation, Cellar, CellarConfig, CellarError, JournalEntryType, JsonFileStore,
    RackType, StoreError,
};

use crate::support::{self, cell, CHABLIS, POMEROL};

#[test]
fn state_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let config = CellarConfig::default()
        .with_data_dir(dir.path())
        .with_default_user("alice");

    let rack_id = {
        let cellar = Cellar::from_config(JsonFileStore::open(dir.path()).unwrap(), &config);
        support::seed(&cellar);
        let rack = cellar.create_rack("Cave", 2, 2, RackType::Shelf).unwrap();
        cellar.fill_rack_with_wine(&rack.id, CHABLIS).unwrap();
        rack.id
    };

    for key in ["vf_racks", "vf_bottles", "vf_wines", "vf_cellar_journal"] {
        assert!(dir.path().join(format!("{key}.json")).exists(), "{key} missing");
    }

    let cellar = Cellar::new(JsonFileStore::open(dir.path()).unwrap());
    assert_eq!(cellar.racks().unwrap()[0].id, rack_id);
    assert_eq!(cellar.bottles().unwrap().len(), 4);
    let journal = cellar.journal().unwrap();
    assert_eq!(journal.len(), 1);
    assert_eq!(journal[0].user_id, "alice");
    assert_eq!(journal[0].entry_type, JournalEntryType::In);
}

#[test]
fn no_staging_files_are_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let cellar = Cellar::new(JsonFileStore::open(dir.path()).unwrap());
    support::seed(&cellar);
    let rack = support::rack(&cellar, "Cave", 1, 2);
    let bottle = cellar
        .add_bottle_at_location(POMEROL, cell(&rack, 0, 0))
        .unwrap();
    cellar
        .move_bottle(&bottle.id, BottleLocation::Placed(cell(&rack, 0, 1)))
        .unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn corrupt_collection_is_a_typed_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("vf_bottles.json"), "{not json").unwrap();
    let cellar = Cellar::new(JsonFileStore::open(dir.path()).unwrap());

    let err = cellar.bottles().unwrap_err();
    assert!(matches!(
        err,
        CellarError::Store(StoreError::Serde { ref key, .. }) if key == "vf_bottles"
    ));
    assert!(!err.is_rejection());
    assert!(cellar.add_bottles(CHABLIS, 1, BottleLocation::Unsorted).is_err());
}
