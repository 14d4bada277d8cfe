//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::order::{
    CommandResponse, DiscountKind, FloorCommandPayload, ItemStatus, LineRequest, Order,
    OrderFilter, OrderPage, OrderStatus, OrderSummary, PaymentMethod,
};

use crate::api::dispatch;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, run_blocking};

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub table_id: String,
    pub items: Vec<LineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemsRequest {
    pub items: Vec<LineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ItemStatusRequest {
    pub status: ItemStatus,
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct DiscountRequest {
    pub kind: DiscountKind,
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct PayRequest {
    pub method: PaymentMethod,
    pub amount_tendered: f64,
}

/// Statistics time range (Unix millis, inclusive)
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
}

/// GET /api/orders - 订单列表 (过滤 + 分页，最新在前)
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<OrderFilter>,
) -> AppResult<ApiResponse<OrderPage>> {
    let manager = state.manager.clone();
    let page = run_blocking(move || Ok(manager.list_orders(&filter)?)).await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/orders/{id} - 订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Order>> {
    let manager = state.manager.clone();
    let lookup_id = id.clone();
    let order = run_blocking(move || Ok(manager.get_order(&lookup_id)?))
        .await?
        .ok_or_else(|| AppError::missing(ErrorCode::OrderNotFound, "Order", id))?;
    Ok(ApiResponse::success(order))
}

/// GET /api/orders/stats/summary - 营业概览
pub async fn summary(
    State(state): State<ServerState>,
    Query(range): Query<SummaryQuery>,
) -> AppResult<ApiResponse<OrderSummary>> {
    let manager = state.manager.clone();
    let summary = run_blocking(move || Ok(manager.order_summary(range.start, range.end)?)).await?;
    Ok(ApiResponse::success(summary))
}

/// POST /api/orders - 下单
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(
        &state,
        user,
        FloorCommandPayload::PlaceOrder {
            table_id: payload.table_id,
            items: payload.items,
        },
    )
    .await
}

/// PUT /api/orders/{id}/items - 改单 (整单替换明细)
pub async fn update_items(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateItemsRequest>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(
        &state,
        user,
        FloorCommandPayload::UpdateOrderItems {
            order_id: id,
            items: payload.items,
        },
    )
    .await
}

/// PUT /api/orders/{id}/items/{item_id}/status - 更新出餐状态
pub async fn update_item_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, item_id)): Path<(String, String)>,
    Json(payload): Json<ItemStatusRequest>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(
        &state,
        user,
        FloorCommandPayload::UpdateItemStatus {
            order_id: id,
            item_id,
            status: payload.status,
        },
    )
    .await
}

/// PUT /api/orders/{id}/status - 设置订单状态
pub async fn set_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusRequest>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(
        &state,
        user,
        FloorCommandPayload::SetOrderStatus {
            order_id: id,
            status: payload.status,
        },
    )
    .await
}

/// POST /api/orders/{id}/discount - 折扣
pub async fn apply_discount(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<DiscountRequest>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(
        &state,
        user,
        FloorCommandPayload::ApplyDiscount {
            order_id: id,
            kind: payload.kind,
            value: payload.value,
        },
    )
    .await
}

/// POST /api/orders/{id}/pay - 支付
pub async fn pay(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<PayRequest>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(
        &state,
        user,
        FloorCommandPayload::PayOrder {
            order_id: id,
            method: payload.method,
            amount_tendered: payload.amount_tendered,
        },
    )
    .await
}

/// POST /api/orders/{id}/cancel - 取消订单
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(&state, user, FloorCommandPayload::CancelOrder { order_id: id }).await
}

/// POST /api/orders/{id}/void - 作废已结算订单
pub async fn void(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CommandResponse>> {
    dispatch(&state, user, FloorCommandPayload::VoidOrder { order_id: id }).await
}
