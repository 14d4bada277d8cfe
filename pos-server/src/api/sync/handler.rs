//! Sync API Handlers

use axum::extract::{Query, State};
use serde::Deserialize;
use shared::order::SyncResponse;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppResult, run_blocking};

#[derive(Debug, Deserialize)]
pub struct SyncQuery {
    /// 客户端最后一次看到的序号 (不含)
    #[serde(default)]
    pub since: u64,
}

/// GET /api/sync?since={seq} - 增量同步
pub async fn sync(
    State(state): State<ServerState>,
    Query(query): Query<SyncQuery>,
) -> AppResult<ApiResponse<SyncResponse>> {
    let manager = state.manager.clone();
    let max_gap = state.config.sync_max_gap;
    let response = run_blocking(move || Ok(manager.sync(query.since, max_gap)?)).await?;

    if response.requires_full_sync {
        tracing::info!(
            since = query.since,
            server_sequence = response.server_sequence,
            "Client requires full sync"
        );
    }
    Ok(ApiResponse::success(response))
}
