//! Data models
//!
//! Shared between pos-server and frontend (via API).
//! All ids are strings; tables use the seating plan ids (`t1`..`t15`,
//! `split-{parent}-{i}` for split children), orders use UUID v4.

pub mod dining_table;
pub mod menu_item;
pub mod staff;

// Re-exports
pub use dining_table::*;
pub use menu_item::*;
pub use staff::*;
