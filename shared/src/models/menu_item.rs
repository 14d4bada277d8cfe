//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Menu item as seen by order placement (菜品)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    pub is_available: bool,
}

/// Upsert menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpsert {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

impl From<MenuItemUpsert> for MenuItem {
    fn from(p: MenuItemUpsert) -> Self {
        Self {
            id: p.id,
            name: p.name,
            category: p.category,
            price: p.price,
            is_available: p.is_available,
        }
    }
}
