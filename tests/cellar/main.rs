//! Cellar integration tests.

mod support;

mod events;
mod file_store;
mod invariants;
mod map;
mod scenarios;
