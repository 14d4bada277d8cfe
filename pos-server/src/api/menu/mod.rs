//! Menu API 模块
//!
//! 菜单目录只读 + 上下架。菜品增删改不在本服务范围内。

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}/availability", put(handler::set_availability))
}
