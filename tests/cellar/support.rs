//! Shared fixtures: a small wine list and helpers over an in-memory cellar.

use cellar_map::{Cellar, GridCell, InMemoryStore, Rack, RackType, Store, Wine, WineType};

pub const CHABLIS: &str = "w-chablis";
pub const POMEROL: &str = "w-pomerol";
pub const PORT: &str = "w-port";

pub fn wines() -> Vec<Wine> {
    vec![
        Wine::new(CHABLIS, "Chablis", WineType::White).with_vintage(2020),
        Wine::new(POMEROL, "Pomerol", WineType::Red)
            .with_vintage(2005)
            .favorite(),
        Wine::new(PORT, "Vintage Port", WineType::Sweet),
    ]
}

pub fn seed<S: Store>(cellar: &Cellar<S>) {
    for wine in wines() {
        cellar.save_wine(wine).unwrap();
    }
}

pub fn cellar() -> (Cellar<InMemoryStore>, InMemoryStore) {
    let store = InMemoryStore::new();
    let cellar = Cellar::new(store.clone()).with_user("tester");
    seed(&cellar);
    (cellar, store)
}

pub fn rack<S: Store>(cellar: &Cellar<S>, name: &str, width: u32, height: u32) -> Rack {
    cellar
        .create_rack(name, width, height, RackType::Shelf)
        .unwrap()
}

pub fn cell(rack: &Rack, x: u32, y: u32) -> GridCell {
    GridCell::new(rack.id.clone(), x, y)
}
