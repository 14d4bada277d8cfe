//! Order API Module
//!
//! 查询直接读存储，所有变更都经过 FloorManager。

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::place))
        // Statistics
        .route("/stats/summary", get(handler::summary))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/items", put(handler::update_items))
        // Kitchen
        .route("/{id}/items/{item_id}/status", put(handler::update_item_status))
        .route("/{id}/status", put(handler::set_status))
        // Billing
        .route("/{id}/discount", post(handler::apply_discount))
        .route("/{id}/pay", post(handler::pay))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/void", post(handler::void))
}
