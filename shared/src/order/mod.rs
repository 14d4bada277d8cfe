//! Order and floor command module
//!
//! This module provides types for the floor command system:
//! - Commands: Requests from clients to mutate tables and orders
//! - Events: Immutable facts recorded after command processing
//! - Order: Aggregate state with item-derived status

pub mod command;
pub mod event;
pub mod query;
pub mod snapshot;
pub mod types;

// Re-exports
pub use command::{FloorCommand, FloorCommandPayload};
pub use event::{EventPayload, FloorEvent, FloorEventType};
pub use query::*;
pub use snapshot::{Order, OrderItem, derive_status};
pub use types::*;
