//! Catalog Service - menu items with an in-memory cache
//!
//! Reads are served from the cache; writes go to redb first, then the cache.
//! Order placement only sees the catalog through [`MenuCatalog`].

use crate::floor::storage::{FloorStorage, StorageResult};
use parking_lot::RwLock;
use shared::models::{MenuItem, MenuItemUpsert};
use std::collections::HashMap;
use std::sync::Arc;

/// Menu lookup used when placing an order
pub trait MenuCatalog: Send + Sync {
    fn find_menu_item(&self, id: &str) -> Option<MenuItem>;
}

#[derive(Clone)]
pub struct CatalogService {
    storage: FloorStorage,
    /// Menu cache: menu_item_id -> MenuItem
    items: Arc<RwLock<HashMap<String, MenuItem>>>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("items", &self.items.read().len())
            .finish()
    }
}

impl CatalogService {
    pub fn new(storage: FloorStorage) -> Self {
        Self {
            storage,
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Load all menu items into the cache
    pub fn load(&self) -> StorageResult<usize> {
        let items = self.storage.get_all_menu_items()?;
        let mut cache = self.items.write();
        cache.clear();
        for item in items {
            cache.insert(item.id.clone(), item);
        }
        tracing::info!(count = cache.len(), "Menu catalog loaded");
        Ok(cache.len())
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// List menu items sorted by category, then name
    pub fn list(&self) -> Vec<MenuItem> {
        let mut items: Vec<_> = self.items.read().values().cloned().collect();
        items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        items
    }

    pub fn get(&self, id: &str) -> Option<MenuItem> {
        self.items.read().get(id).cloned()
    }

    /// Create or replace a menu item (DB first, then cache)
    pub fn upsert(&self, payload: MenuItemUpsert) -> StorageResult<MenuItem> {
        let item = MenuItem::from(payload);
        self.storage.store_menu_item(&item)?;
        self.items.write().insert(item.id.clone(), item.clone());
        Ok(item)
    }

    /// Toggle availability; `None` if the item is unknown
    pub fn set_availability(&self, id: &str, is_available: bool) -> StorageResult<Option<MenuItem>> {
        let Some(mut item) = self.get(id) else {
            return Ok(None);
        };
        item.is_available = is_available;
        self.storage.store_menu_item(&item)?;
        self.items.write().insert(item.id.clone(), item.clone());
        tracing::info!(menu_item_id = %id, is_available, "Menu item availability changed");
        Ok(Some(item))
    }
}

impl MenuCatalog for CatalogService {
    fn find_menu_item(&self, id: &str) -> Option<MenuItem> {
        self.get(id)
    }
}
