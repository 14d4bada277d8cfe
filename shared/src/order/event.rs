//! Floor events - immutable facts recorded after command processing

use super::types::{DiscountKind, ItemStatus, OrderStatus, PaymentMethod};
use crate::models::TableStatus;
use serde::{Deserialize, Serialize};

/// Floor event - immutable audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number (for ordering and replay)
    pub sequence: u64,
    /// Table or order this event is about
    pub aggregate_id: String,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Client timestamp (Unix milliseconds) - for audit and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_timestamp: Option<i64>,
    pub operator_id: String,
    /// Operator name (snapshot for audit)
    pub operator_name: String,
    /// Command that triggered this event
    pub command_id: String,
    pub event_type: FloorEventType,
    pub payload: EventPayload,
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FloorEventType {
    // Topology
    TableStatusChanged,
    TableSplit,
    TableUnsplit,
    TablesMerged,
    TablesUnmerged,
    TableUnmergedOne,
    OrderReassigned,

    // Orders
    OrderPlaced,
    OrderItemsUpdated,
    ItemStatusUpdated,
    OrderStatusChanged,
    DiscountApplied,
    OrderPaid,
    OrderCancelled,

    // Billing
    BillFinalized,
    SplitRecombined,
    OrderVoided,
}

impl std::fmt::Display for FloorEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TableStatusChanged => "TABLE_STATUS_CHANGED",
            Self::TableSplit => "TABLE_SPLIT",
            Self::TableUnsplit => "TABLE_UNSPLIT",
            Self::TablesMerged => "TABLES_MERGED",
            Self::TablesUnmerged => "TABLES_UNMERGED",
            Self::TableUnmergedOne => "TABLE_UNMERGED_ONE",
            Self::OrderReassigned => "ORDER_REASSIGNED",
            Self::OrderPlaced => "ORDER_PLACED",
            Self::OrderItemsUpdated => "ORDER_ITEMS_UPDATED",
            Self::ItemStatusUpdated => "ITEM_STATUS_UPDATED",
            Self::OrderStatusChanged => "ORDER_STATUS_CHANGED",
            Self::DiscountApplied => "DISCOUNT_APPLIED",
            Self::OrderPaid => "ORDER_PAID",
            Self::OrderCancelled => "ORDER_CANCELLED",
            Self::BillFinalized => "BILL_FINALIZED",
            Self::SplitRecombined => "SPLIT_RECOMBINED",
            Self::OrderVoided => "ORDER_VOIDED",
        };
        f.write_str(name)
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    // ========== Topology ==========
    TableStatusChanged {
        table_id: String,
        from: TableStatus,
        to: TableStatus,
    },
    TableSplit {
        table_id: String,
        children: Vec<String>,
        capacities: Vec<u32>,
    },
    TableUnsplit {
        table_id: String,
        removed_children: Vec<String>,
        capacity: u32,
    },
    TablesMerged {
        master_id: String,
        members: Vec<String>,
        capacity: u32,
    },
    TablesUnmerged {
        master_id: String,
        released: Vec<String>,
    },
    TableUnmergedOne {
        master_id: String,
        table_id: String,
        master_capacity: u32,
    },
    OrderReassigned {
        order_id: String,
        from_table_id: String,
        to_table_id: String,
    },

    // ========== Orders ==========
    OrderPlaced {
        order_id: String,
        order_code: String,
        table_id: String,
        table_number: String,
        item_count: usize,
        total: f64,
    },
    OrderItemsUpdated {
        order_id: String,
        added: usize,
        removed: usize,
        item_count: usize,
        total: f64,
        order_status: OrderStatus,
    },
    ItemStatusUpdated {
        order_id: String,
        item_id: String,
        from: ItemStatus,
        to: ItemStatus,
        order_status: OrderStatus,
    },
    OrderStatusChanged {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        prep_time_minutes: Option<u32>,
    },
    DiscountApplied {
        order_id: String,
        kind: DiscountKind,
        value: f64,
        discount: f64,
        total: f64,
    },
    OrderPaid {
        order_id: String,
        method: PaymentMethod,
        total: f64,
        amount_tendered: f64,
        change: f64,
    },
    OrderCancelled {
        order_id: String,
    },

    // ========== Billing ==========
    BillFinalized {
        order_id: String,
        table_id: String,
        released_tables: Vec<String>,
    },
    SplitRecombined {
        parent_id: String,
        removed_children: Vec<String>,
        capacity: u32,
    },
    OrderVoided {
        order_id: String,
        refunded: bool,
    },
}

impl EventPayload {
    pub fn event_type(&self) -> FloorEventType {
        match self {
            Self::TableStatusChanged { .. } => FloorEventType::TableStatusChanged,
            Self::TableSplit { .. } => FloorEventType::TableSplit,
            Self::TableUnsplit { .. } => FloorEventType::TableUnsplit,
            Self::TablesMerged { .. } => FloorEventType::TablesMerged,
            Self::TablesUnmerged { .. } => FloorEventType::TablesUnmerged,
            Self::TableUnmergedOne { .. } => FloorEventType::TableUnmergedOne,
            Self::OrderReassigned { .. } => FloorEventType::OrderReassigned,
            Self::OrderPlaced { .. } => FloorEventType::OrderPlaced,
            Self::OrderItemsUpdated { .. } => FloorEventType::OrderItemsUpdated,
            Self::ItemStatusUpdated { .. } => FloorEventType::ItemStatusUpdated,
            Self::OrderStatusChanged { .. } => FloorEventType::OrderStatusChanged,
            Self::DiscountApplied { .. } => FloorEventType::DiscountApplied,
            Self::OrderPaid { .. } => FloorEventType::OrderPaid,
            Self::OrderCancelled { .. } => FloorEventType::OrderCancelled,
            Self::BillFinalized { .. } => FloorEventType::BillFinalized,
            Self::SplitRecombined { .. } => FloorEventType::SplitRecombined,
            Self::OrderVoided { .. } => FloorEventType::OrderVoided,
        }
    }

    /// Order the event is about, if any
    pub fn order_id(&self) -> Option<&str> {
        match self {
            Self::OrderReassigned { order_id, .. }
            | Self::OrderPlaced { order_id, .. }
            | Self::OrderItemsUpdated { order_id, .. }
            | Self::ItemStatusUpdated { order_id, .. }
            | Self::OrderStatusChanged { order_id, .. }
            | Self::DiscountApplied { order_id, .. }
            | Self::OrderPaid { order_id, .. }
            | Self::OrderCancelled { order_id }
            | Self::BillFinalized { order_id, .. }
            | Self::OrderVoided { order_id, .. } => Some(order_id),
            Self::TableStatusChanged { .. }
            | Self::TableSplit { .. }
            | Self::TableUnsplit { .. }
            | Self::TablesMerged { .. }
            | Self::TablesUnmerged { .. }
            | Self::TableUnmergedOne { .. }
            | Self::SplitRecombined { .. } => None,
        }
    }
}

impl FloorEvent {
    /// Create a new event
    ///
    /// # Arguments
    /// * `sequence` - Global sequence number (authoritative ordering)
    /// * `aggregate_id` - Table or order this event belongs to
    /// * `operator_id` - Operator who triggered this event
    /// * `operator_name` - Operator name (snapshot for audit)
    /// * `command_id` - Command that triggered this event
    /// * `client_timestamp` - Client-provided timestamp (may have clock skew)
    /// * `payload` - Event payload (determines the event type)
    pub fn new(
        sequence: u64,
        aggregate_id: String,
        operator_id: String,
        operator_name: String,
        command_id: String,
        client_timestamp: Option<i64>,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            aggregate_id,
            // Server timestamp is ALWAYS set by server
            timestamp: chrono::Utc::now().timestamp_millis(),
            client_timestamp,
            operator_id,
            operator_name,
            command_id,
            event_type: payload.event_type(),
            payload,
        }
    }
}
