//! Default seating plan and starter menu
//!
//! Written on first start only: tables when the store has none, the menu
//! when the catalog is empty. Existing data is never touched.

use super::storage::{FloorStorage, StorageResult};
use shared::models::{DiningTable, MenuItem};

/// (number, capacity) of the fifteen-table floor plan
const SEATING_PLAN: [(&str, u32); 15] = [
    ("01", 2),
    ("02", 2),
    ("03", 2),
    ("04", 2),
    ("05", 2),
    ("06", 4),
    ("07", 4),
    ("08", 4),
    ("09", 4),
    ("10", 4),
    ("11", 8),
    ("12", 8),
    ("13", 10),
    ("14", 4),
    ("15", 4),
];

/// (id, name, category, price)
const STARTER_MENU: [(&str, &str, &str, f64); 7] = [
    ("1", "Margherita Pizza", "Main", 299.0),
    ("2", "Caesar Salad", "Starters", 199.0),
    ("3", "Grilled Salmon", "Main", 599.0),
    ("4", "Tiramisu", "Dessert", 149.0),
    ("5", "Iced Tea", "Beverage", 79.0),
    ("6", "Pasta Carbonara", "Main", 349.0),
    ("7", "Garlic Bread", "Starters", 99.0),
];

pub fn default_tables() -> Vec<DiningTable> {
    SEATING_PLAN
        .iter()
        .enumerate()
        .map(|(i, (number, capacity))| DiningTable::new(format!("t{}", i + 1), *number, *capacity))
        .collect()
}

pub fn default_menu() -> Vec<MenuItem> {
    STARTER_MENU
        .iter()
        .map(|(id, name, category, price)| MenuItem {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            price: *price,
            is_available: true,
        })
        .collect()
}

/// What [`seed_if_empty`] wrote
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub tables: usize,
    pub menu_items: usize,
}

/// Seed tables and menu into an empty store
pub fn seed_if_empty(storage: &FloorStorage) -> StorageResult<SeedReport> {
    let mut report = SeedReport::default();

    if storage.count_tables()? == 0 {
        let tables = default_tables();
        let txn = storage.begin_write()?;
        for table in &tables {
            storage.store_table(&txn, table)?;
        }
        txn.commit()?;
        report.tables = tables.len();
    }

    if storage.get_all_menu_items()?.is_empty() {
        let menu = default_menu();
        storage.store_menu_items(&menu)?;
        report.menu_items = menu.len();
    }

    if report != SeedReport::default() {
        tracing::info!(
            tables = report.tables,
            menu_items = report.menu_items,
            "Seeded default floor data"
        );
    }
    Ok(report)
}
