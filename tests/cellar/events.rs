//! Change notifications delivered after commit.

#![cfg(feature = "emitter")]

use std::sync::mpsc;
use std::time::Duration;

use cellar_map::{BottleLocation, CellarError};
use serde_json::Value;

use crate::support::{self, cell, CHABLIS};

#[test]
fn listeners_receive_committed_moves() {
    let (cellar, _) = support::cellar();
    let rack = support::rack(&cellar, "Cave", 2, 1);
    let bottle = cellar
        .add_bottle_at_location(CHABLIS, cell(&rack, 0, 0))
        .unwrap();

    let (tx, rx) = mpsc::channel::<String>();
    cellar.on("bottle.moved", move |payload: String| {
        tx.send(payload).unwrap();
    });

    cellar
        .move_bottle(&bottle.id, BottleLocation::Placed(cell(&rack, 1, 0)))
        .unwrap();

    let payload = rx.recv_timeout(Duration::from_secs(1)).unwrap();
    let event: Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(event["event"], "bottle.moved");
    assert_eq!(event["bottleId"], bottle.id.as_str());
    assert_eq!(event["to"]["x"], 1);
}

#[test]
fn rejected_operations_emit_nothing() {
    let (cellar, _) = support::cellar();
    let rack = support::rack(&cellar, "Cave", 1, 1);
    cellar
        .add_bottle_at_location(CHABLIS, cell(&rack, 0, 0))
        .unwrap();

    let (tx, rx) = mpsc::channel::<String>();
    cellar.on("bottles.added", move |payload: String| {
        tx.send(payload).unwrap();
    });

    let err = cellar
        .add_bottle_at_location(CHABLIS, cell(&rack, 0, 0))
        .unwrap_err();
    assert!(matches!(err, CellarError::Conflict { .. }));
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn handles_share_listeners() {
    let (cellar, _) = support::cellar();
    let (tx, rx) = mpsc::channel::<String>();
    cellar.on("journal.noted", move |payload: String| {
        tx.send(payload).unwrap();
    });

    cellar.for_user("guest").add_note(None, "stocktake").unwrap();
    let event: Value =
        serde_json::from_str(&rx.recv_timeout(Duration::from_secs(1)).unwrap()).unwrap();
    assert_eq!(event["event"], "journal.noted");
}
