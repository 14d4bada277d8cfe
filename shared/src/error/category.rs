//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 4xxx: Order errors
/// - 5xxx: Payment errors
/// - 6xxx: Menu errors
/// - 7xxx: Table errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Order errors (4xxx)
    Order,
    /// Payment errors (5xxx)
    Payment,
    /// Menu errors (6xxx)
    Menu,
    /// Table errors (7xxx)
    Table,
    /// System errors (9xxx and anything unassigned)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            4000..5000 => Self::Order,
            5000..6000 => Self::Payment,
            6000..7000 => Self::Menu,
            7000..8000 => Self::Table,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Order => "order",
            Self::Payment => "payment",
            Self::Menu => "menu",
            Self::Table => "table",
            Self::System => "system",
        }
    }
}

/// Caller-facing error kind
///
/// Every rejected floor operation is one of these. NOT_FOUND means the
/// client holds stale state and should refresh; VALIDATION and CONFLICT are
/// user-correctable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    Internal,
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }

    /// Get the caller-facing kind for this error code
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound
            | Self::OrderNotFound
            | Self::OrderItemNotFound
            | Self::TableNotFound => ErrorKind::NotFound,

            Self::Conflict
            | Self::AlreadyExists
            | Self::OrderAlreadyServed
            | Self::OrderAlreadyCancelled
            | Self::OrderNotSettled
            | Self::TableOccupied
            | Self::TableAlreadyEmpty
            | Self::TableNotAvailable
            | Self::TableGrouped
            | Self::TableNotSplit
            | Self::TableNotMerged
            | Self::SplitChildOccupied => ErrorKind::Conflict,

            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::StorageFull
            | Self::OutOfMemory
            | Self::StorageCorrupted
            | Self::SystemBusy => ErrorKind::Internal,

            // 菜单缺货、折扣越界、金额不足等都属于可纠正的输入错误
            _ => ErrorKind::Validation,
        }
    }
}
