//! Randomised operation sequences against the occupancy invariant.

use std::collections::HashMap;

use cellar_map::{Bottle, BottleLocation, Cellar, GridCell, InMemoryStore, Rack};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::support::{self, CHABLIS, POMEROL, PORT};

const WINES: [&str; 3] = [CHABLIS, POMEROL, PORT];

/// Every active placed bottle sits inside an existing rack, alone.
fn assert_consistent(cellar: &Cellar<InMemoryStore>) {
    let snapshot = cellar.snapshot().unwrap();
    let mut seen: HashMap<&GridCell, &Bottle> = HashMap::new();
    for bottle in snapshot.bottles.iter().filter(|b| b.is_active()) {
        let Some(cell) = bottle.location.cell() else {
            continue;
        };
        let rack = snapshot
            .rack(&cell.rack_id)
            .unwrap_or_else(|| panic!("bottle {} points at a missing rack", bottle.id));
        assert!(rack.contains(cell), "bottle {} outside {}", bottle.id, rack.name);
        if let Some(other) = seen.insert(cell, bottle) {
            panic!("{} and {} share {}", other.id, bottle.id, cell);
        }
    }
}

fn random_cell(rng: &mut StdRng, racks: &[Rack]) -> Option<GridCell> {
    if racks.is_empty() {
        return None;
    }
    let rack = &racks[rng.gen_range(0..racks.len())];
    // Occasionally aim just outside the grid.
    Some(GridCell::new(
        rack.id.clone(),
        rng.gen_range(0..=rack.width),
        rng.gen_range(0..rack.height),
    ))
}

fn random_active(rng: &mut StdRng, cellar: &Cellar<InMemoryStore>) -> Option<Bottle> {
    let active: Vec<Bottle> = cellar
        .bottles()
        .unwrap()
        .into_iter()
        .filter(Bottle::is_active)
        .collect();
    if active.is_empty() {
        None
    } else {
        Some(active[rng.gen_range(0..active.len())].clone())
    }
}

fn run_sequence(seed: u64, steps: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let (cellar, _) = support::cellar();
    support::rack(&cellar, "A", 3, 2);
    support::rack(&cellar, "B", 2, 2);

    for _ in 0..steps {
        let racks = cellar.racks().unwrap();
        let wine = WINES[rng.gen_range(0..WINES.len())];
        // Rejections are expected; only the invariant matters.
        let _ = match rng.gen_range(0..8) {
            0 => match random_cell(&mut rng, &racks) {
                Some(cell) => cellar.add_bottle_at_location(wine, cell).map(|_| ()),
                None => Ok(()),
            },
            1 => cellar
                .add_bottles(wine, rng.gen_range(0..3), BottleLocation::Unsorted)
                .map(|_| ()),
            2 => match (random_active(&mut rng, &cellar), random_cell(&mut rng, &racks)) {
                (Some(bottle), Some(cell)) => cellar
                    .move_bottle(&bottle.id, BottleLocation::Placed(cell))
                    .map(|_| ()),
                _ => Ok(()),
            },
            3 => match racks.first() {
                Some(rack) => cellar.fill_rack_with_wine(&rack.id, wine).map(|_| ()),
                None => Ok(()),
            },
            4 => match random_active(&mut rng, &cellar) {
                Some(bottle) => cellar
                    .consume_specific_bottle(&bottle.wine_id, &bottle.id)
                    .map(|_| ()),
                None => Ok(()),
            },
            5 => match random_active(&mut rng, &cellar) {
                Some(bottle) => cellar
                    .gift_bottle(&bottle.wine_id, &bottle.id, "Sam", None)
                    .map(|_| ()),
                None => Ok(()),
            },
            6 if rng.gen_bool(0.2) && !racks.is_empty() => {
                cellar.delete_rack(&racks[0].id).map(|_| ())
            }
            _ => {
                let (w, h) = (rng.gen_range(1..4), rng.gen_range(1..4));
                support::rack(&cellar, "C", w, h);
                Ok(())
            }
        };
        assert_consistent(&cellar);
    }
}

#[test]
fn at_most_one_active_bottle_per_cell() {
    for seed in 0..16 {
        run_sequence(seed, 60);
    }
}

#[test]
fn journal_tracks_every_inventory_change() {
    let mut rng = StdRng::seed_from_u64(7);
    let (cellar, _) = support::cellar();
    let rack = support::rack(&cellar, "A", 2, 2);

    let mut expected = 0;
    for _ in 0..20 {
        let before = cellar.bottles().unwrap();
        let result = match rng.gen_range(0..3) {
            0 => cellar
                .add_bottles(CHABLIS, 1, BottleLocation::Unsorted)
                .map(|_| ()),
            1 => cellar.fill_rack_with_wine(&rack.id, POMEROL).map(|_| ()),
            _ => cellar.consume_bottle(CHABLIS).map(|_| ()),
        };
        result.unwrap();
        if cellar.bottles().unwrap() != before {
            expected += 1;
        }
    }
    assert_eq!(cellar.journal().unwrap().len(), expected);
}
