//! Floor command module - tables, orders and billing
//!
//! - **actions**: one handler per floor command (topology, order lifecycle, billing)
//! - **manager**: [`FloorManager`] for command processing, queries and sync
//! - **storage**: redb-based persistence for tables, orders, menu and events
//! - **reports**: order listing and statistics
//! - **seed**: default seating plan and starter menu
//!
//! # Architecture
//!
//! ```text
//! FloorCommand → FloorManager → Action → FloorEvent(s) → Storage (redb)
//!                     ↓                                       ↓
//!                 Broadcast                          Tables / Orders
//!                     ↓
//!              All Subscribers
//! ```
//!
//! # Data Flow
//!
//! 1. Client sends a FloorCommand over HTTP
//! 2. FloorManager opens one write transaction and runs the action
//! 3. The action validates every precondition, then stages table/order changes
//! 4. Events (global sequence) and staged entities are persisted together
//! 5. Events are broadcast to all subscribers
//! 6. CommandResponse is returned to client

pub mod actions;
pub mod manager;
pub mod reports;
pub mod seed;
pub mod storage;
pub mod traits;

// Re-exports
pub use manager::{FloorManager, ManagerError, ManagerResult};
pub use storage::{FloorStorage, StorageError, StorageResult};
pub use traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};

// Re-export shared types for convenience
pub use shared::order::{
    CommandError, CommandResponse, EventPayload, FloorCommand, FloorCommandPayload, FloorEvent,
    FloorEventType, Order, OrderStatus,
};
