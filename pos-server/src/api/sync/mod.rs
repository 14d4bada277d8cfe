//! Sync API 模块
//!
//! 轮询同步：客户端带上最后一次看到的序号，拿到之后的事件和当前快照。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/sync", get(handler::sync))
}
