//! Floor commands - requests from clients to mutate tables and orders

use super::types::{DiscountKind, ItemStatus, LineRequest, OrderStatus, PaymentMethod};
use crate::models::{StaffRef, TableStatus};
use serde::{Deserialize, Serialize};

/// Floor command envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorCommand {
    /// Client-generated id, used for idempotency
    pub command_id: String,
    /// Staff member issuing the command
    pub operator: StaffRef,
    /// Client timestamp (Unix milliseconds)
    pub timestamp: i64,
    pub payload: FloorCommandPayload,
}

impl FloorCommand {
    pub fn new(operator: StaffRef, payload: FloorCommandPayload) -> Self {
        Self {
            command_id: uuid::Uuid::new_v4().to_string(),
            operator,
            timestamp: crate::util::now_millis(),
            payload,
        }
    }
}

/// Command payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FloorCommandPayload {
    // ========== Table topology ==========
    SetTableStatus {
        table_id: String,
        status: TableStatus,
    },
    SplitTable {
        table_id: String,
        parts: u32,
    },
    UnsplitTable {
        table_id: String,
    },
    MergeTables {
        master_id: String,
        other_ids: Vec<String>,
    },
    UnmergeAll {
        master_id: String,
    },
    UnmergeOne {
        master_id: String,
        table_id: String,
    },
    ReassignTable {
        from_table_id: String,
        to_table_id: String,
    },

    // ========== Order lifecycle ==========
    PlaceOrder {
        table_id: String,
        items: Vec<LineRequest>,
    },
    /// Replace the lines of an open order; lines already sent to the
    /// kitchen keep their id and status
    UpdateOrderItems {
        order_id: String,
        items: Vec<LineRequest>,
    },
    UpdateItemStatus {
        order_id: String,
        item_id: String,
        status: ItemStatus,
    },
    SetOrderStatus {
        order_id: String,
        status: OrderStatus,
    },
    ApplyDiscount {
        order_id: String,
        kind: DiscountKind,
        value: f64,
    },
    PayOrder {
        order_id: String,
        method: PaymentMethod,
        amount_tendered: f64,
    },
    CancelOrder {
        order_id: String,
    },

    // ========== Billing ==========
    FinalizeBill {
        table_id: String,
    },
    VoidOrder {
        order_id: String,
    },
}

impl FloorCommandPayload {
    /// Short operation name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetTableStatus { .. } => "set_table_status",
            Self::SplitTable { .. } => "split_table",
            Self::UnsplitTable { .. } => "unsplit_table",
            Self::MergeTables { .. } => "merge_tables",
            Self::UnmergeAll { .. } => "unmerge_all",
            Self::UnmergeOne { .. } => "unmerge_one",
            Self::ReassignTable { .. } => "reassign_table",
            Self::PlaceOrder { .. } => "place_order",
            Self::UpdateOrderItems { .. } => "update_order_items",
            Self::UpdateItemStatus { .. } => "update_item_status",
            Self::SetOrderStatus { .. } => "set_order_status",
            Self::ApplyDiscount { .. } => "apply_discount",
            Self::PayOrder { .. } => "pay_order",
            Self::CancelOrder { .. } => "cancel_order",
            Self::FinalizeBill { .. } => "finalize_bill",
            Self::VoidOrder { .. } => "void_order",
        }
    }
}
