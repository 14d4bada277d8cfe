//! FloorManager - command processing and floor queries
//!
//! This module handles:
//! - Command validation and processing
//! - Event generation with global sequence numbers
//! - Persistence to redb (transactional)
//! - Event broadcasting
//! - Read-side queries (tables, orders, statistics, sync)
//!
//! # Command Flow
//!
//! ```text
//! execute_command(cmd)
//!     ├─ 1. Idempotency check (command_id)
//!     ├─ 2. Begin write transaction
//!     ├─ 3. Create CommandContext
//!     ├─ 4. Convert command to action and execute
//!     ├─ 5. Persist events, tables and orders
//!     ├─ 6. Mark command processed
//!     ├─ 7. Commit transaction
//!     ├─ 8. Broadcast event(s)
//!     └─ 9. Return response
//! ```

mod error;
pub use error::*;

use super::actions::CommandAction;
use super::reports;
use super::storage::{FloorStorage, StorageError};
use super::traits::{CommandContext, CommandHandler, CommandMetadata};
use crate::services::catalog_service::MenuCatalog;
use shared::models::{DiningTable, MenuItem};
use shared::order::{
    CommandResponse, EventPayload, FloorCommand, FloorCommandPayload, FloorEvent, Order,
    OrderFilter, OrderPage, OrderSummary, SyncResponse,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// FloorManager for command processing
///
/// The `epoch` field is a unique identifier generated on each startup.
/// Clients use it to detect server restarts and trigger full resync.
pub struct FloorManager {
    storage: FloorStorage,
    event_tx: broadcast::Sender<FloorEvent>,
    /// Server instance epoch - unique ID generated on startup
    epoch: String,
    /// Menu lookup for order placement
    catalog: Option<Arc<dyn MenuCatalog>>,
}

impl std::fmt::Debug for FloorManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloorManager")
            .field("storage", &"<FloorStorage>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl FloorManager {
    /// Create a new FloorManager with the given database path
    pub fn new(db_path: impl AsRef<Path>) -> ManagerResult<Self> {
        let storage = FloorStorage::open(db_path)?;
        let manager = Self::with_storage(storage);
        tracing::info!(epoch = %manager.epoch, "FloorManager started with new epoch");
        Ok(manager)
    }

    /// Create a FloorManager over existing storage
    pub fn with_storage(storage: FloorStorage) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            storage,
            event_tx,
            epoch: uuid::Uuid::new_v4().to_string(),
            catalog: None,
        }
    }

    /// Set the menu catalog used by order placement
    pub fn set_catalog(&mut self, catalog: Arc<dyn MenuCatalog>) {
        self.catalog = Some(catalog);
    }

    /// Get the server epoch (unique instance ID)
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<FloorEvent> {
        self.event_tx.subscribe()
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &FloorStorage {
        &self.storage
    }

    /// Execute a command and return the response
    pub fn execute_command(&self, cmd: FloorCommand) -> CommandResponse {
        let command_id = cmd.command_id.clone();
        let name = cmd.payload.name();
        match self.process_command(cmd) {
            Ok((response, events)) => {
                // Broadcast events after successful commit
                for event in events {
                    if self.event_tx.send(event).is_err() {
                        tracing::debug!("Event broadcast skipped: no active receivers");
                        break;
                    }
                }
                response
            }
            Err(err) => {
                tracing::warn!(command_id = %command_id, command = name, error = %err, "Command rejected");
                CommandResponse::error(command_id, err.into())
            }
        }
    }

    /// Snapshot of the menu items an order command references
    fn menu_items_for(&self, ids: impl Iterator<Item = String>) -> HashMap<String, MenuItem> {
        let Some(catalog) = &self.catalog else {
            tracing::warn!("No menu catalog configured, every menu item will be rejected");
            return HashMap::new();
        };
        ids.filter_map(|id| catalog.find_menu_item(&id).map(|item| (id, item)))
            .collect()
    }

    /// Process command and return response with events
    fn process_command(
        &self,
        cmd: FloorCommand,
    ) -> ManagerResult<(CommandResponse, Vec<FloorEvent>)> {
        tracing::debug!(command_id = %cmd.command_id, payload = ?cmd.payload, "Processing command");

        // 1. Idempotency check (before transaction)
        if self.storage.is_command_processed(&cmd.command_id)? {
            tracing::warn!(command_id = %cmd.command_id, "Duplicate command");
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        // 2. Begin write transaction (single writer: commands are serialized here)
        let txn = self.storage.begin_write()?;

        // Double-check idempotency within transaction
        if self
            .storage
            .is_command_processed_txn(&txn, &cmd.command_id)?
        {
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        // 3. Context and metadata
        let current_sequence = self.storage.get_current_sequence_txn(&txn)?;
        let mut ctx = CommandContext::new(&txn, &self.storage, current_sequence);
        let metadata = CommandMetadata {
            command_id: cmd.command_id.clone(),
            operator_id: cmd.operator.id.clone(),
            operator_name: cmd.operator.name.clone(),
            operator_role: cmd.operator.role,
            timestamp: cmd.timestamp,
        };

        // 4. Convert to action and execute
        // For PlaceOrder and UpdateOrderItems: inject the menu snapshot from the catalog
        let action = match CommandAction::from(&cmd) {
            CommandAction::PlaceOrder(mut action) => {
                action.menu_items =
                    self.menu_items_for(action.items.iter().map(|l| l.menu_item_id.clone()));
                CommandAction::PlaceOrder(action)
            }
            CommandAction::UpdateOrderItems(mut action) => {
                action.menu_items =
                    self.menu_items_for(action.items.iter().map(|l| l.menu_item_id.clone()));
                CommandAction::UpdateOrderItems(action)
            }
            other => other,
        };
        let events = futures::executor::block_on(action.execute(&mut ctx, &metadata))?;
        let changes = ctx.into_changes();

        // 5. Persist events, tables and orders
        let now = shared::util::now_millis();
        let max_sequence = events
            .iter()
            .map(|e| e.sequence)
            .max()
            .unwrap_or(current_sequence);

        for event in &events {
            self.storage.store_event(&txn, event)?;
        }
        for mut table in changes.tables {
            table.updated_at = now;
            self.storage.store_table(&txn, &table)?;
        }
        for table_id in &changes.removed_tables {
            self.storage.remove_table(&txn, table_id)?;
        }
        for mut order in changes.orders {
            order.last_sequence = max_sequence;
            self.storage.store_order(&txn, &order)?;
        }
        if max_sequence > current_sequence {
            self.storage.set_sequence(&txn, max_sequence)?;
        }

        // 6. Mark command processed
        self.storage.mark_command_processed(&txn, &cmd.command_id)?;

        // 7. Commit transaction
        txn.commit().map_err(StorageError::from)?;

        let response = build_response(&cmd, &events);
        tracing::info!(
            command_id = %cmd.command_id,
            command = cmd.payload.name(),
            order_id = ?response.order_id,
            event_count = events.len(),
            noop = response.is_noop(),
            "Command processed successfully"
        );
        Ok((response, events))
    }

    // ========== Public Query Methods ==========

    pub fn get_table(&self, table_id: &str) -> ManagerResult<Option<DiningTable>> {
        Ok(self.storage.get_table(table_id)?)
    }

    /// All tables sorted by display number
    pub fn list_tables(&self) -> ManagerResult<Vec<DiningTable>> {
        Ok(self.storage.get_all_tables()?)
    }

    pub fn get_order(&self, order_id: &str) -> ManagerResult<Option<Order>> {
        Ok(self.storage.get_order(order_id)?)
    }

    /// Filtered, paginated order list (newest first)
    pub fn list_orders(&self, filter: &OrderFilter) -> ManagerResult<OrderPage> {
        let orders = self.storage.get_all_orders()?;
        Ok(reports::paginate(orders, filter))
    }

    /// Orders that are not yet SERVED or CANCELLED
    pub fn get_active_orders(&self) -> ManagerResult<Vec<Order>> {
        Ok(self.storage.get_active_orders()?)
    }

    /// Order statistics for orders created within `[start, end]`
    pub fn order_summary(&self, start: Option<i64>, end: Option<i64>) -> ManagerResult<OrderSummary> {
        let range = OrderFilter {
            start,
            end,
            ..Default::default()
        };
        let orders: Vec<Order> = self
            .storage
            .get_all_orders()?
            .into_iter()
            .filter(|o| range.in_range(o.created_at))
            .collect();
        Ok(reports::summarize(&orders))
    }

    /// Get current sequence number
    pub fn get_current_sequence(&self) -> ManagerResult<u64> {
        Ok(self.storage.get_current_sequence()?)
    }

    /// Get events since a given sequence
    pub fn get_events_since(&self, since_sequence: u64) -> ManagerResult<Vec<FloorEvent>> {
        Ok(self.storage.get_events_since(since_sequence)?)
    }

    /// Polling sync
    ///
    /// Returns the events after `since_sequence` together with the current
    /// tables and active orders. When the client is ahead of the server
    /// (restart with a fresh store) or further behind than `max_gap`, no
    /// events are returned and `requires_full_sync` is set.
    pub fn sync(&self, since_sequence: u64, max_gap: u64) -> ManagerResult<SyncResponse> {
        let server_sequence = self.storage.get_current_sequence()?;
        let requires_full_sync = since_sequence > server_sequence
            || server_sequence - since_sequence > max_gap;
        let events = if requires_full_sync {
            vec![]
        } else {
            self.storage.get_events_since(since_sequence)?
        };
        Ok(SyncResponse {
            events,
            tables: self.storage.get_all_tables()?,
            active_orders: self.storage.get_active_orders()?,
            server_sequence,
            requires_full_sync,
        })
    }
}

// Make FloorManager Clone-able via Arc
impl Clone for FloorManager {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            event_tx: self.event_tx.clone(),
            epoch: self.epoch.clone(),
            catalog: self.catalog.clone(),
        }
    }
}

/// Build the response for a committed command from its events
fn build_response(cmd: &FloorCommand, events: &[FloorEvent]) -> CommandResponse {
    if events.is_empty() {
        let reason = match &cmd.payload {
            FloorCommandPayload::FinalizeBill { table_id } => {
                format!("Table {} has no open order", table_id)
            }
            _ => "Already in the requested state".to_string(),
        };
        return CommandResponse::noop(cmd.command_id.clone(), reason);
    }

    let order_id = events
        .iter()
        .find_map(|e| e.payload.order_id())
        .map(str::to_string);
    let mut response = CommandResponse::success(cmd.command_id.clone(), order_id);

    let mut table_ids = Vec::new();
    for event in events {
        match &event.payload {
            EventPayload::TableSplit { children, .. } => table_ids.extend(children.iter().cloned()),
            EventPayload::BillFinalized {
                released_tables, ..
            } => table_ids.extend(released_tables.iter().cloned()),
            EventPayload::SplitRecombined { parent_id, .. } => table_ids.push(parent_id.clone()),
            EventPayload::OrderPaid { change, .. } => response = response.with_change(*change),
            _ => {}
        }
    }
    response.with_table_ids(table_ids)
}

#[cfg(test)]
mod tests;
