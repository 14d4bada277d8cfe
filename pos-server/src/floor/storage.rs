//! redb-based storage layer for the floor state
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `dining_tables` | `table_id` | `DiningTable` | Table topology and occupancy |
//! | `orders` | `order_id` | `Order` | Order aggregates (all statuses) |
//! | `active_orders` | `order_id` | `()` | Non-terminal order index |
//! | `menu_items` | `menu_item_id` | `MenuItem` | Menu catalog |
//! | `events` | `sequence` | `FloorEvent` | Event stream (append-only) |
//! | `processed_commands` | `command_id` | `()` | Idempotency check |
//! | `sequence_counter` | `"seq"` / `"order_count"` | `u64` | Global sequence and order counter |
//!
//! # Atomicity
//!
//! A command reads and writes every table it touches inside one
//! `WriteTransaction`. redb admits a single writer at a time, so commands
//! are serialized and a failed command leaves no partial state behind.

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use shared::models::{DiningTable, MenuItem};
use shared::order::{FloorEvent, Order};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for dining tables: key = table_id, value = JSON-serialized DiningTable
const TABLES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("dining_tables");

/// Table for orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for tracking active orders: key = order_id, value = empty (existence check)
const ACTIVE_ORDERS_TABLE: TableDefinition<&str, ()> = TableDefinition::new("active_orders");

/// Table for the menu catalog: key = menu_item_id, value = JSON-serialized MenuItem
const MENU_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("menu_items");

/// Table for storing events: key = sequence, value = JSON-serialized FloorEvent
const EVENTS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("events");

/// Table for tracking processed commands: key = command_id, value = empty (idempotency)
const PROCESSED_COMMANDS_TABLE: TableDefinition<&str, ()> =
    TableDefinition::new("processed_commands");

/// Table for counters: key = "seq" or "order_count", value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const SEQUENCE_KEY: &str = "seq";
const ORDER_COUNT_KEY: &str = "order_count";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Floor storage backed by redb
#[derive(Clone)]
pub struct FloorStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for FloorStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloorStorage").finish_non_exhaustive()
    }
}

impl FloorStorage {
    /// Open or create the database at the given path
    ///
    /// redb commits are durable as soon as `commit()` returns, and the file
    /// stays consistent across power loss (copy-on-write with atomic swap).
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            // Create all tables if they don't exist
            let _ = write_txn.open_table(TABLES_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ACTIVE_ORDERS_TABLE)?;
            let _ = write_txn.open_table(MENU_TABLE)?;
            let _ = write_txn.open_table(EVENTS_TABLE)?;
            let _ = write_txn.open_table(PROCESSED_COMMANDS_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(SEQUENCE_KEY)?.is_none() {
                seq_table.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    ///
    /// Blocks while another write transaction is open.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Sequence Operations ==========

    /// Current sequence within a transaction
    pub fn get_current_sequence_txn(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let table = txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Get current sequence (read-only)
    pub fn get_current_sequence(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Set sequence number (within transaction)
    pub fn set_sequence(&self, txn: &WriteTransaction, sequence: u64) -> StorageResult<()> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        table.insert(SEQUENCE_KEY, sequence)?;
        Ok(())
    }

    // ========== Order Counter (for order code) ==========

    /// Increment the order counter inside the command transaction
    ///
    /// Returns the NEW count. Rolled back together with the command.
    pub fn next_order_count(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        let current = table
            .get(ORDER_COUNT_KEY)?
            .map(|g| g.value())
            .unwrap_or(0);
        let next = current + 1;
        table.insert(ORDER_COUNT_KEY, next)?;
        Ok(next)
    }

    // ========== Command Idempotency ==========

    /// Check if a command has been processed
    pub fn is_command_processed(&self, command_id: &str) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    /// Check if a command has been processed (within transaction)
    pub fn is_command_processed_txn(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    /// Mark a command as processed
    pub fn mark_command_processed(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        table.insert(command_id, ())?;
        Ok(())
    }

    // ========== Event Operations ==========

    /// Store an event
    pub fn store_event(&self, txn: &WriteTransaction, event: &FloorEvent) -> StorageResult<()> {
        let mut table = txn.open_table(EVENTS_TABLE)?;
        let value = serde_json::to_vec(event)?;
        table.insert(event.sequence, value.as_slice())?;
        Ok(())
    }

    /// Get events since a given sequence (exclusive), in sequence order
    pub fn get_events_since(&self, since_sequence: u64) -> StorageResult<Vec<FloorEvent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS_TABLE)?;

        let mut events = Vec::new();
        for result in table.range(since_sequence.saturating_add(1)..)? {
            let (_key, value) = result?;
            let event: FloorEvent = serde_json::from_slice(value.value())?;
            events.push(event);
        }
        Ok(events)
    }

    // ========== Table Operations ==========

    /// Store a table
    pub fn store_table(&self, txn: &WriteTransaction, table: &DiningTable) -> StorageResult<()> {
        let mut t = txn.open_table(TABLES_TABLE)?;
        let value = serde_json::to_vec(table)?;
        t.insert(table.id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Remove a table (split children on recombine)
    pub fn remove_table(&self, txn: &WriteTransaction, table_id: &str) -> StorageResult<()> {
        let mut t = txn.open_table(TABLES_TABLE)?;
        t.remove(table_id)?;
        Ok(())
    }

    /// Get a table (within transaction)
    pub fn get_table_txn(
        &self,
        txn: &WriteTransaction,
        table_id: &str,
    ) -> StorageResult<Option<DiningTable>> {
        let t = txn.open_table(TABLES_TABLE)?;
        match t.get(table_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get a table by ID
    pub fn get_table(&self, table_id: &str) -> StorageResult<Option<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(TABLES_TABLE)?;
        match t.get(table_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get all tables, ordered by display number
    pub fn get_all_tables(&self) -> StorageResult<Vec<DiningTable>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(TABLES_TABLE)?;

        let mut tables = Vec::new();
        for result in t.iter()? {
            let (_key, value) = result?;
            let table: DiningTable = serde_json::from_slice(value.value())?;
            tables.push(table);
        }
        tables.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(tables)
    }

    pub fn count_tables(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(TABLES_TABLE)?;
        Ok(t.len()?)
    }

    // ========== Order Operations ==========

    /// Store an order and keep the active index in step with its status
    pub fn store_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        {
            let mut t = txn.open_table(ORDERS_TABLE)?;
            let value = serde_json::to_vec(order)?;
            t.insert(order.id.as_str(), value.as_slice())?;
        }
        if order.is_terminal() {
            self.mark_order_inactive(txn, &order.id)
        } else {
            self.mark_order_active(txn, &order.id)
        }
    }

    /// Get an order (within transaction)
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let t = txn.open_table(ORDERS_TABLE)?;
        match t.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order by ID
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(ORDERS_TABLE)?;
        match t.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get all orders (any status)
    pub fn get_all_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in t.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            orders.push(order);
        }
        Ok(orders)
    }

    // ========== Active Orders ==========

    /// Mark an order as active
    pub fn mark_order_active(&self, txn: &WriteTransaction, order_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        table.insert(order_id, ())?;
        Ok(())
    }

    /// Mark an order as inactive
    pub fn mark_order_inactive(&self, txn: &WriteTransaction, order_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(ACTIVE_ORDERS_TABLE)?;
        table.remove(order_id)?;
        Ok(())
    }

    /// Get all active (non-terminal) orders
    pub fn get_active_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let active = read_txn.open_table(ACTIVE_ORDERS_TABLE)?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;

        let mut result = Vec::new();
        for entry in active.iter()? {
            let (key, _value) = entry?;
            if let Some(value) = orders.get(key.value())? {
                let order: Order = serde_json::from_slice(value.value())?;
                result.push(order);
            }
        }
        Ok(result)
    }

    // ========== Menu Operations ==========

    /// Store a menu item in its own transaction
    pub fn store_menu_item(&self, item: &MenuItem) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut t = txn.open_table(MENU_TABLE)?;
            let value = serde_json::to_vec(item)?;
            t.insert(item.id.as_str(), value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Store many menu items atomically
    pub fn store_menu_items(&self, items: &[MenuItem]) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut t = txn.open_table(MENU_TABLE)?;
            for item in items {
                let value = serde_json::to_vec(item)?;
                t.insert(item.id.as_str(), value.as_slice())?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Get all menu items
    pub fn get_all_menu_items(&self) -> StorageResult<Vec<MenuItem>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(MENU_TABLE)?;

        let mut items = Vec::new();
        for result in t.iter()? {
            let (_key, value) = result?;
            let item: MenuItem = serde_json::from_slice(value.value())?;
            items.push(item);
        }
        Ok(items)
    }

    // ========== Statistics ==========

    /// Get storage statistics
    pub fn get_stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;

        let tables_table = read_txn.open_table(TABLES_TABLE)?;
        let orders_table = read_txn.open_table(ORDERS_TABLE)?;
        let active_table = read_txn.open_table(ACTIVE_ORDERS_TABLE)?;
        let events_table = read_txn.open_table(EVENTS_TABLE)?;
        let commands_table = read_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        let seq_table = read_txn.open_table(SEQUENCE_TABLE)?;

        Ok(StorageStats {
            table_count: tables_table.len()?,
            order_count: orders_table.len()?,
            active_order_count: active_table.len()?,
            event_count: events_table.len()?,
            processed_command_count: commands_table.len()?,
            current_sequence: seq_table
                .get(SEQUENCE_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(0),
        })
    }
}

/// Storage statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageStats {
    pub table_count: u64,
    pub order_count: u64,
    pub active_order_count: u64,
    pub event_count: u64,
    pub processed_command_count: u64,
    pub current_sequence: u64,
}
