//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::{TableStatus, TableView};
use shared::order::{CommandResponse, FloorCommandPayload};

use crate::api::dispatch;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, run_blocking};

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: TableStatus,
}

#[derive(Debug, Deserialize)]
pub struct SplitRequest {
    pub parts: u32,
}

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    /// 并入主桌的其他桌台
    pub table_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    pub to_table_id: String,
}

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<TableView>>> {
    let manager = state.manager.clone();
    let tables = run_blocking(move || Ok(manager.list_tables()?)).await?;
    Ok(ApiResponse::success(tables.iter().map(TableView::from).collect()))
}

/// GET /api/tables/{id} - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<TableView>> {
    let manager = state.manager.clone();
    let lookup_id = id.clone();
    let table = run_blocking(move || Ok(manager.get_table(&lookup_id)?))
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::TableNotFound, "Table", id))?;
    Ok(ApiResponse::success(TableView::from(&table)))
}

/// PUT /api/tables/{id}/status - 设置桌台状态
pub async fn set_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(
        &state,
        user,
        FloorCommandPayload::SetTableStatus {
            table_id: id,
            status: payload.status,
        },
    )
    .await
}

/// POST /api/tables/{id}/split - 拆台
pub async fn split(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<SplitRequest>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(
        &state,
        user,
        FloorCommandPayload::SplitTable {
            table_id: id,
            parts: payload.parts,
        },
    )
    .await
}

/// POST /api/tables/{id}/unsplit - 取消拆台
pub async fn unsplit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(&state, user, FloorCommandPayload::UnsplitTable { table_id: id }).await
}

/// POST /api/tables/{id}/merge - 并台
pub async fn merge(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<MergeRequest>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(
        &state,
        user,
        FloorCommandPayload::MergeTables {
            master_id: id,
            other_ids: payload.table_ids,
        },
    )
    .await
}

/// POST /api/tables/{id}/unmerge - 全部拆开
pub async fn unmerge_all(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(&state, user, FloorCommandPayload::UnmergeAll { master_id: id }).await
}

/// POST /api/tables/{id}/unmerge/{member_id} - 移出单桌
pub async fn unmerge_one(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, member_id)): Path<(String, String)>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(
        &state,
        user,
        FloorCommandPayload::UnmergeOne {
            master_id: id,
            table_id: member_id,
        },
    )
    .await
}

/// POST /api/tables/{id}/reassign - 换台
pub async fn reassign(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReassignRequest>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(
        &state,
        user,
        FloorCommandPayload::ReassignTable {
            from_table_id: id,
            to_table_id: payload.to_table_id,
        },
    )
    .await
}

/// POST /api/tables/{id}/finalize - 结账并释放桌台
pub async fn finalize(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(&state, user, FloorCommandPayload::FinalizeBill { table_id: id }).await
}
