//! 健康检查路由
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /health | GET | 健康检查 (含存储探测) |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "version": "0.1.0",
//!   "epoch": "6f1c...",
//!   "uptime_seconds": 42,
//!   "server_sequence": 17
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::time::SystemTime;

use crate::core::ServerState;
use crate::utils::run_blocking;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    /// FloorManager 实例 ID，重启后变化
    epoch: String,
    uptime_seconds: u64,
    /// 存储不可读时为空
    #[serde(skip_serializing_if = "Option::is_none")]
    server_sequence: Option<u64>,
}

// 服务器启动时间 (懒加载静态变量)
static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

/// 首次调用时记录启动时间
pub fn mark_started() {
    START_TIME.get_or_init(SystemTime::now);
}

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// GET /health
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let manager = state.manager.clone();
    let sequence = run_blocking(move || Ok(manager.get_current_sequence()?)).await;
    if let Err(e) = &sequence {
        tracing::warn!(error = %e.message, "Health check: storage unavailable");
    }

    Json(HealthResponse {
        status: if sequence.is_ok() { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        epoch: state.manager.epoch().to_string(),
        uptime_seconds: get_uptime_seconds(),
        server_sequence: sequence.ok(),
    })
}
