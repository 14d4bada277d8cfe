//! Shared types for floor command processing

use crate::error::{ErrorCode, ErrorKind};
use crate::models::DiningTable;
use serde::{Deserialize, Serialize};

// ============================================================================
// Status enums
// ============================================================================

/// Preparation stage of a single line item (出餐状态)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    /// Set only by the terminal propagation rule
    Served,
    /// Set only by the terminal propagation rule
    Cancelled,
}

impl ItemStatus {
    /// Statuses the kitchen may set directly
    pub fn is_kitchen_stage(&self) -> bool {
        matches!(self, Self::Pending | Self::Preparing | Self::Ready)
    }
}

/// Order status (derived from items unless forced terminal)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Served,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Served | Self::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
    Refunded,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    Online,
}

/// Discount kind (折扣类型)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    /// Percentage of the subtotal (0-100)
    Percentage,
    /// Fixed amount, at most the subtotal
    Amount,
}

// ============================================================================
// Input types
// ============================================================================

/// Requested line when placing an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineRequest {
    pub menu_item_id: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ============================================================================
// Command response
// ============================================================================

/// Command response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    /// The command ID this responds to
    pub command_id: String,
    /// Whether the command succeeded
    pub success: bool,
    /// The command id was already processed; nothing changed
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub duplicate: bool,
    /// Explicit no-op state with its reason (e.g. finalize on an empty table)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noop: Option<String>,
    /// Order created or touched by the command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Tables created or released by the command (split children, finalize)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub table_ids: Vec<String>,
    /// Change returned to the guest (pay only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    /// Error details if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CommandError>,
}

impl CommandResponse {
    pub fn success(command_id: String, order_id: Option<String>) -> Self {
        Self {
            command_id,
            success: true,
            duplicate: false,
            noop: None,
            order_id,
            table_ids: Vec::new(),
            change: None,
            error: None,
        }
    }

    pub fn noop(command_id: String, reason: impl Into<String>) -> Self {
        Self {
            noop: Some(reason.into()),
            ..Self::success(command_id, None)
        }
    }

    pub fn error(command_id: String, error: CommandError) -> Self {
        Self {
            success: false,
            error: Some(error),
            ..Self::success(command_id, None)
        }
    }

    pub fn duplicate(command_id: String) -> Self {
        Self {
            duplicate: true,
            ..Self::success(command_id, None)
        }
    }

    pub fn with_table_ids(mut self, table_ids: Vec<String>) -> Self {
        self.table_ids = table_ids;
        self
    }

    pub fn with_change(mut self, change: f64) -> Self {
        self.change = Some(change);
        self
    }

    pub fn is_noop(&self) -> bool {
        self.noop.is_some()
    }
}

/// Command error
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandError {
    pub code: ErrorCode,
    pub kind: ErrorKind,
    pub message: String,
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            kind: code.kind(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Sync
// ============================================================================

/// Sync response for polling clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Events since the requested sequence
    pub events: Vec<super::event::FloorEvent>,
    /// Current table set
    pub tables: Vec<DiningTable>,
    /// Orders that are not yet terminal
    pub active_orders: Vec<super::snapshot::Order>,
    /// Server's current sequence number
    pub server_sequence: u64,
    /// Whether full sync is required (gap too large)
    pub requires_full_sync: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_terminal() {
        assert!(OrderStatus::Served.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
    }

    #[test]
    fn test_kitchen_stage() {
        assert!(ItemStatus::Preparing.is_kitchen_stage());
        assert!(!ItemStatus::Served.is_kitchen_stage());
    }

    #[test]
    fn test_noop_response_serialize() {
        let resp = CommandResponse::noop("cmd-1".to_string(), "table has no order");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["noop"], "table has no order");
        assert!(json.get("duplicate").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_command_error_kind() {
        let err = CommandError::new(ErrorCode::TableNotAvailable, "Table 12 is OCCUPIED");
        assert_eq!(err.kind, ErrorKind::Conflict);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], 7004);
        assert_eq!(json["kind"], "CONFLICT");
    }
}
