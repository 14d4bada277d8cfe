//! Shared types for the floor service
//!
//! Domain types used by pos-server and its clients: tables and their
//! structural roles, the order aggregate, floor commands and events, and the
//! unified error system.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
