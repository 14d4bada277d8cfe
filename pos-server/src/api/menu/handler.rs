//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::MenuItem;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, run_blocking};

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub is_available: bool,
}

/// GET /api/menu - 获取菜单 (按分类、名称排序)
pub async fn list(State(state): State<ServerState>) -> ApiResponse<Vec<MenuItem>> {
    ApiResponse::success(state.catalog.list())
}

/// PUT /api/menu/{id}/availability - 菜品上下架
pub async fn set_availability(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<AvailabilityRequest>,
) -> AppResult<ApiResponse<MenuItem>> {
    tracing::info!(staff_id = %user.id, menu_item_id = %id, is_available = payload.is_available, "Menu availability update");

    let catalog = state.catalog.clone();
    let lookup_id = id.clone();
    let item = run_blocking(move || {
        catalog
            .set_availability(&lookup_id, payload.is_available)
            .map_err(|e| AppError::database(e.to_string()))
    })
    .await?;

    item.map(ApiResponse::success)
        .ok_or_else(|| AppError::missing(ErrorCode::MenuItemNotFound, "Menu item", id))
}
