//! Unified error codes for the floor service
//!
//! This module defines all error codes used across pos-server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Operation conflicts with current state
    Conflict = 9,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been paid
    OrderAlreadyPaid = 4002,
    /// Order has already been served
    OrderAlreadyServed = 4003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,
    /// Order is neither paid nor served
    OrderNotSettled = 4005,
    /// Order item not found
    OrderItemNotFound = 4006,
    /// Order has no items
    OrderEmpty = 4007,
    /// Item status not accepted by this operation
    InvalidItemStatus = 4008,
    /// Order status not accepted by this operation
    InvalidOrderStatus = 4009,
    /// Item quantity must be at least one
    InvalidQuantity = 4010,

    // ==================== 5xxx: Payment ====================
    /// Amount tendered is less than the order total
    PaymentInsufficientAmount = 5002,
    /// Discount value outside the accepted range
    DiscountOutOfRange = 5006,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item exists but is not available
    MenuItemUnavailable = 6002,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table already holds an order
    TableOccupied = 7002,
    /// Table holds no order
    TableAlreadyEmpty = 7003,
    /// Table is not AVAILABLE
    TableNotAvailable = 7004,
    /// Table structural role forbids the operation
    TableGrouped = 7005,
    /// Table is not a split parent
    TableNotSplit = 7006,
    /// Table is not a merge master (or not one of its members)
    TableNotMerged = 7007,
    /// Split part count out of range
    InvalidSplitParts = 7008,
    /// Merge participant list is malformed
    InvalidMergeSet = 7009,
    /// Status cannot be set directly
    InvalidTableStatus = 7010,
    /// A split child still holds an order
    SplitChildOccupied = 7011,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Storage full (disk space exhausted)
    StorageFull = 9401,
    /// Out of memory
    OutOfMemory = 9402,
    /// Storage corrupted
    StorageCorrupted = 9403,
    /// System busy (storage contention)
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::Conflict => "Operation conflicts with current state",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyPaid => "Order has already been paid",
            ErrorCode::OrderAlreadyServed => "Order has already been served",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderNotSettled => "Order is neither paid nor served",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::OrderEmpty => "Order has no items",
            ErrorCode::InvalidItemStatus => "Item status is not accepted",
            ErrorCode::InvalidOrderStatus => "Order status is not accepted",
            ErrorCode::InvalidQuantity => "Item quantity must be at least 1",

            // Payment
            ErrorCode::PaymentInsufficientAmount => "Amount tendered is less than the total",
            ErrorCode::DiscountOutOfRange => "Discount is out of range",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemUnavailable => "Menu item is not available",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableOccupied => "Table already has an order",
            ErrorCode::TableAlreadyEmpty => "Table has no order",
            ErrorCode::TableNotAvailable => "Table is not available",
            ErrorCode::TableGrouped => "Table is part of a split or merge",
            ErrorCode::TableNotSplit => "Table is not split",
            ErrorCode::TableNotMerged => "Table is not merged",
            ErrorCode::InvalidSplitParts => "Invalid number of split parts",
            ErrorCode::InvalidMergeSet => "Invalid merge table list",
            ErrorCode::InvalidTableStatus => "Table status cannot be set directly",
            ErrorCode::SplitChildOccupied => "A split child still has an order",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageFull => "Storage is full",
            ErrorCode::OutOfMemory => "Out of memory",
            ErrorCode::StorageCorrupted => "Storage is corrupted",
            ErrorCode::SystemBusy => "System is busy, retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::Conflict),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyPaid),
            4003 => Ok(ErrorCode::OrderAlreadyServed),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4005 => Ok(ErrorCode::OrderNotSettled),
            4006 => Ok(ErrorCode::OrderItemNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::InvalidItemStatus),
            4009 => Ok(ErrorCode::InvalidOrderStatus),
            4010 => Ok(ErrorCode::InvalidQuantity),

            // Payment
            5002 => Ok(ErrorCode::PaymentInsufficientAmount),
            5006 => Ok(ErrorCode::DiscountOutOfRange),

            // Menu
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemUnavailable),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableOccupied),
            7003 => Ok(ErrorCode::TableAlreadyEmpty),
            7004 => Ok(ErrorCode::TableNotAvailable),
            7005 => Ok(ErrorCode::TableGrouped),
            7006 => Ok(ErrorCode::TableNotSplit),
            7007 => Ok(ErrorCode::TableNotMerged),
            7008 => Ok(ErrorCode::InvalidSplitParts),
            7009 => Ok(ErrorCode::InvalidMergeSet),
            7010 => Ok(ErrorCode::InvalidTableStatus),
            7011 => Ok(ErrorCode::SplitChildOccupied),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9401 => Ok(ErrorCode::StorageFull),
            9402 => Ok(ErrorCode::OutOfMemory),
            9403 => Ok(ErrorCode::StorageCorrupted),
            9404 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
