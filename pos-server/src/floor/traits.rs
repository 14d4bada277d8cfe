//! Command handling contracts
//!
//! - [`CommandContext`]: transactional view of tables and orders for one command
//! - [`CommandHandler`]: one implementation per floor operation
//! - [`FloorError`]: business rule violations, each mapped to an [`ErrorCode`]

use async_trait::async_trait;
use redb::WriteTransaction;
use shared::error::ErrorCode;
use shared::models::{DiningTable, StaffRef, StaffRole};
use shared::order::{EventPayload, FloorEvent, Order};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

use super::storage::{FloorStorage, StorageError};

/// Business errors raised while executing a command
#[derive(Debug, Error)]
pub enum FloorError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order item not found: {0}")]
    ItemNotFound(String),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    #[error("Menu item unavailable: {0}")]
    MenuItemUnavailable(String),

    #[error("Table is occupied: {0}")]
    TableOccupied(String),

    #[error("Table has no open order: {0}")]
    TableAlreadyEmpty(String),

    #[error("Table is not available: {0}")]
    TableNotAvailable(String),

    #[error("Table is grouped: {0}")]
    TableGrouped(String),

    #[error("Table is not split: {0}")]
    TableNotSplit(String),

    #[error("Table is not merged: {0}")]
    TableNotMerged(String),

    #[error("Split child still holds an order: {0}")]
    SplitChildOccupied(String),

    #[error("Invalid split: {0}")]
    InvalidSplitParts(String),

    #[error("Invalid merge: {0}")]
    InvalidMergeSet(String),

    #[error("Invalid table status: {0}")]
    InvalidTableStatus(String),

    #[error("Order has no items")]
    EmptyOrder,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid item status: {0}")]
    InvalidItemStatus(String),

    #[error("Invalid order status: {0}")]
    InvalidOrderStatus(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Order already paid: {0}")]
    OrderAlreadyPaid(String),

    #[error("Order already served: {0}")]
    OrderAlreadyServed(String),

    #[error("Order already cancelled: {0}")]
    OrderAlreadyCancelled(String),

    #[error("Order is not settled: {0}")]
    OrderNotSettled(String),

    #[error("Discount out of range: {0}")]
    DiscountOutOfRange(String),

    #[error("Insufficient payment: total {total}, tendered {tendered}")]
    InsufficientPayment { total: f64, tendered: f64 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl FloorError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::TableNotFound(_) => ErrorCode::TableNotFound,
            Self::OrderNotFound(_) => ErrorCode::OrderNotFound,
            Self::ItemNotFound(_) => ErrorCode::OrderItemNotFound,
            Self::MenuItemNotFound(_) => ErrorCode::MenuItemNotFound,
            Self::MenuItemUnavailable(_) => ErrorCode::MenuItemUnavailable,
            Self::TableOccupied(_) => ErrorCode::TableOccupied,
            Self::TableAlreadyEmpty(_) => ErrorCode::TableAlreadyEmpty,
            Self::TableNotAvailable(_) => ErrorCode::TableNotAvailable,
            Self::TableGrouped(_) => ErrorCode::TableGrouped,
            Self::TableNotSplit(_) => ErrorCode::TableNotSplit,
            Self::TableNotMerged(_) => ErrorCode::TableNotMerged,
            Self::SplitChildOccupied(_) => ErrorCode::SplitChildOccupied,
            Self::InvalidSplitParts(_) => ErrorCode::InvalidSplitParts,
            Self::InvalidMergeSet(_) => ErrorCode::InvalidMergeSet,
            Self::InvalidTableStatus(_) => ErrorCode::InvalidTableStatus,
            Self::EmptyOrder => ErrorCode::OrderEmpty,
            Self::InvalidQuantity(_) => ErrorCode::InvalidQuantity,
            Self::InvalidItemStatus(_) => ErrorCode::InvalidItemStatus,
            Self::InvalidOrderStatus(_) => ErrorCode::InvalidOrderStatus,
            Self::InvalidAmount(_) => ErrorCode::ValueOutOfRange,
            Self::OrderAlreadyPaid(_) => ErrorCode::OrderAlreadyPaid,
            Self::OrderAlreadyServed(_) => ErrorCode::OrderAlreadyServed,
            Self::OrderAlreadyCancelled(_) => ErrorCode::OrderAlreadyCancelled,
            Self::OrderNotSettled(_) => ErrorCode::OrderNotSettled,
            Self::DiscountOutOfRange(_) => ErrorCode::DiscountOutOfRange,
            Self::InsufficientPayment { .. } => ErrorCode::PaymentInsufficientAmount,
            Self::InvalidRequest(_) => ErrorCode::InvalidRequest,
            Self::Storage(_) => ErrorCode::DatabaseError,
        }
    }
}

/// Metadata of the command being executed
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub operator_id: String,
    pub operator_name: String,
    pub operator_role: StaffRole,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
}

impl CommandMetadata {
    pub fn operator(&self) -> StaffRef {
        StaffRef::new(&self.operator_id, &self.operator_name, self.operator_role)
    }
}

/// Changes staged by a command, persisted by the manager on success
#[derive(Debug, Default)]
pub struct StagedChanges {
    pub tables: Vec<DiningTable>,
    pub removed_tables: Vec<String>,
    pub orders: Vec<Order>,
}

/// Transactional working set for one command
///
/// Reads go through the write transaction so every check sees the state the
/// command will commit against. Writes are staged in memory and only reach
/// storage through [`CommandContext::into_changes`].
pub struct CommandContext<'a> {
    txn: &'a WriteTransaction,
    storage: &'a FloorStorage,
    tables: HashMap<String, DiningTable>,
    modified_tables: BTreeMap<String, DiningTable>,
    removed_tables: BTreeSet<String>,
    orders: BTreeMap<String, Order>,
    modified_orders: BTreeSet<String>,
    current_sequence: u64,
}

impl<'a> CommandContext<'a> {
    /// `current_sequence` is the last committed sequence; the first
    /// [`next_sequence`](Self::next_sequence) call returns `current_sequence + 1`.
    pub fn new(txn: &'a WriteTransaction, storage: &'a FloorStorage, current_sequence: u64) -> Self {
        Self {
            txn,
            storage,
            tables: HashMap::new(),
            modified_tables: BTreeMap::new(),
            removed_tables: BTreeSet::new(),
            orders: BTreeMap::new(),
            modified_orders: BTreeSet::new(),
            current_sequence,
        }
    }

    // ========== Tables ==========

    pub fn find_table(&mut self, table_id: &str) -> Result<Option<DiningTable>, FloorError> {
        if self.removed_tables.contains(table_id) {
            return Ok(None);
        }
        if let Some(table) = self.modified_tables.get(table_id) {
            return Ok(Some(table.clone()));
        }
        if let Some(table) = self.tables.get(table_id) {
            return Ok(Some(table.clone()));
        }
        let loaded = self.storage.get_table_txn(self.txn, table_id)?;
        if let Some(table) = &loaded {
            self.tables.insert(table_id.to_string(), table.clone());
        }
        Ok(loaded)
    }

    pub fn load_table(&mut self, table_id: &str) -> Result<DiningTable, FloorError> {
        self.find_table(table_id)?
            .ok_or_else(|| FloorError::TableNotFound(table_id.to_string()))
    }

    pub fn save_table(&mut self, table: DiningTable) {
        self.removed_tables.remove(&table.id);
        self.modified_tables.insert(table.id.clone(), table);
    }

    pub fn remove_table(&mut self, table_id: &str) {
        self.modified_tables.remove(table_id);
        self.removed_tables.insert(table_id.to_string());
    }

    // ========== Orders ==========

    pub fn load_order(&mut self, order_id: &str) -> Result<Order, FloorError> {
        if let Some(order) = self.orders.get(order_id) {
            return Ok(order.clone());
        }
        let order = self
            .storage
            .get_order_txn(self.txn, order_id)?
            .ok_or_else(|| FloorError::OrderNotFound(order_id.to_string()))?;
        self.orders.insert(order_id.to_string(), order.clone());
        Ok(order)
    }

    pub fn save_order(&mut self, order: Order) {
        self.modified_orders.insert(order.id.clone());
        self.orders.insert(order.id.clone(), order);
    }

    // ========== Counters ==========

    /// Allocate the next global sequence number
    pub fn next_sequence(&mut self) -> u64 {
        self.current_sequence += 1;
        self.current_sequence
    }

    pub fn current_sequence(&self) -> u64 {
        self.current_sequence
    }

    /// Next value of the persistent order counter (same transaction)
    pub fn next_order_count(&self) -> Result<u64, FloorError> {
        Ok(self.storage.next_order_count(self.txn)?)
    }

    /// Build an event with the next sequence number
    pub fn emit(
        &mut self,
        metadata: &CommandMetadata,
        aggregate_id: &str,
        payload: EventPayload,
    ) -> FloorEvent {
        let seq = self.next_sequence();
        FloorEvent::new(
            seq,
            aggregate_id.to_string(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            payload,
        )
    }

    /// Consume the context and hand back everything it staged
    pub fn into_changes(self) -> StagedChanges {
        let Self {
            modified_tables,
            removed_tables,
            mut orders,
            modified_orders,
            ..
        } = self;
        StagedChanges {
            tables: modified_tables.into_values().collect(),
            removed_tables: removed_tables.into_iter().collect(),
            orders: modified_orders
                .iter()
                .filter_map(|id| orders.remove(id))
                .collect(),
        }
    }
}

/// Command handler implemented by every floor action
///
/// An empty event list means the command changed nothing. Handlers run on
/// the manager's blocking executor while holding the write transaction, so
/// the futures are not required to be `Send`.
#[async_trait(?Send)]
pub trait CommandHandler: Send + Sync {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError>;
}
