//! HTTP 流程测试 - 通过 axum Router 驱动完整的楼面流程
//!
//! 不启动监听端口，直接用 `tower::ServiceExt::oneshot` 调用路由。

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use pos_server::services::{HttpService, build_router};
use pos_server::{Config, ServerState};
use serde_json::{Value, json};
use tower::ServiceExt;

fn init_app() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    config.seed_defaults = true;
    let state = ServerState::initialize(&config).unwrap();
    (dir, build_router(state))
}

/// 发送请求，返回状态码和 JSON 响应体
async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Staff-Id", "w1")
        .header("X-Staff-Name", "Asha")
        .header("X-Staff-Role", "WAITER");
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    call(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    call(app, Method::POST, uri, Some(body)).await
}

async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    call(app, Method::PUT, uri, Some(body)).await
}

fn money(value: &Value) -> f64 {
    value.as_f64().unwrap()
}

// ========== 基础 ==========

#[tokio::test]
async fn test_health_and_menu() {
    let (_dir, app) = init_app();

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["server_sequence"], 0);

    let (status, body) = get(&app, "/api/menu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_http_service_oneshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize(&config).unwrap();
    let service = HttpService::new(config, state);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = service.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_tables_listing() {
    let (_dir, app) = init_app();

    let (status, body) = get(&app, "/api/tables").await;
    assert_eq!(status, StatusCode::OK);
    let tables = body["data"].as_array().unwrap();
    assert_eq!(tables.len(), 15);
    assert_eq!(tables[0]["number"], "01");
    assert_eq!(tables[0]["is_orderable"], true);

    let (status, body) = get(&app, "/api/tables/t13").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["capacity"], 10);

    let (status, body) = get(&app, "/api/tables/t99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 7001);
}

// ========== 下单 → 支付 → 结账 ==========

#[tokio::test]
async fn test_order_to_finalize_flow() {
    let (_dir, app) = init_app();

    let (status, body) = post(
        &app,
        "/api/orders",
        json!({
            "table_id": "t2",
            "items": [
                { "menu_item_id": "1", "quantity": 1 },
                { "menu_item_id": "2", "quantity": 1, "note": "no croutons" }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let order_id = body["data"]["order_id"].as_str().unwrap().to_string();

    let (_, body) = get(&app, &format!("/api/orders/{}", order_id)).await;
    let order = &body["data"];
    assert_eq!(order["table_id"], "t2");
    assert!((money(&order["subtotal"]) - 498.0).abs() < 0.001);
    assert!((money(&order["total"]) - 522.9).abs() < 0.001);
    assert_eq!(order["waiter"]["name"], "Asha");

    // 桌台已被占用
    let (status, body) = post(
        &app,
        "/api/orders",
        json!({ "table_id": "t2", "items": [{ "menu_item_id": "5", "quantity": 1 }] }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 7002);

    // 付款不足
    let (status, body) = post(
        &app,
        &format!("/api/orders/{}/pay", order_id),
        json!({ "method": "CASH", "amount_tendered": 500.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5002);

    let (status, body) = post(
        &app,
        &format!("/api/orders/{}/pay", order_id),
        json!({ "method": "CASH", "amount_tendered": 600.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!((money(&body["data"]["change"]) - 77.1).abs() < 0.001);

    let (status, body) = post(&app, "/api/tables/t2/finalize", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("noop").is_none());

    let (_, body) = get(&app, "/api/tables/t2").await;
    assert_eq!(body["data"]["status"], "AVAILABLE");

    // 空桌结账为 noop
    let (status, body) = post(&app, "/api/tables/t2/finalize", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["noop"].as_str().unwrap().contains("t2"));
}

#[tokio::test]
async fn test_order_validation_errors() {
    let (_dir, app) = init_app();

    let (status, body) = post(&app, "/api/orders", json!({ "table_id": "t1", "items": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4007);

    let (status, body) = post(
        &app,
        "/api/orders",
        json!({ "table_id": "t1", "items": [{ "menu_item_id": "99", "quantity": 1 }] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6001);

    let (status, body) = get(&app, "/api/orders/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_edit_order_items_over_http() {
    let (_dir, app) = init_app();

    let (_, body) = post(
        &app,
        "/api/orders",
        json!({ "table_id": "t4", "items": [{ "menu_item_id": "1", "quantity": 1 }] }),
    )
    .await;
    let order_id = body["data"]["order_id"].as_str().unwrap().to_string();

    let (status, body) = put(
        &app,
        &format!("/api/orders/{}/items", order_id),
        json!({ "items": [
            { "menu_item_id": "1", "quantity": 1 },
            { "menu_item_id": "5", "quantity": 1 }
        ] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["order_id"], order_id.as_str());

    let (_, body) = get(&app, &format!("/api/orders/{}", order_id)).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert!((money(&body["data"]["total"]) - 396.9).abs() < 0.001);

    let (status, body) = put(
        &app,
        "/api/orders/missing/items",
        json!({ "items": [{ "menu_item_id": "1", "quantity": 1 }] }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

// ========== 拆台 / 并台 ==========

#[tokio::test]
async fn test_split_and_merge_over_http() {
    let (_dir, app) = init_app();

    let (status, body) = post(&app, "/api/tables/t12/split", json!({ "parts": 2 })).await;
    assert_eq!(status, StatusCode::OK);
    let children = body["data"]["table_ids"].as_array().unwrap();
    assert_eq!(children.len(), 2);

    let (_, body) = get(&app, "/api/tables/split-t12-0").await;
    assert_eq!(body["data"]["number"], "12.1");
    assert_eq!(body["data"]["parent_id"], "t12");

    let (status, body) = post(&app, "/api/tables/t12/split", json!({ "parts": 2 })).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, _) = post(&app, "/api/tables/t12/unsplit", json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(&app, "/api/tables/t5/merge", json!({ "table_ids": ["t6"] })).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&app, "/api/tables/t6").await;
    assert_eq!(body["data"]["status"], "MERGED");
    assert_eq!(body["data"]["master_table_id"], "t5");

    let (status, _) = post(&app, "/api/tables/t5/unmerge/t6", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&app, "/api/tables/t6").await;
    assert_eq!(body["data"]["status"], "AVAILABLE");
}

// ========== 身份 / 同步 ==========

#[tokio::test]
async fn test_missing_staff_header_rejected() {
    let (_dir, app) = init_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/tables/t1/finalize")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sync_after_commands() {
    let (_dir, app) = init_app();

    post(&app, "/api/tables/t13/split", json!({ "parts": 3 })).await;
    let (status, _) = put(&app, "/api/tables/t8/status", json!({ "status": "RESERVED" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, "/api/sync?since=0").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["requires_full_sync"], false);
    assert_eq!(data["events"].as_array().unwrap().len(), 2);
    assert_eq!(data["server_sequence"], 2);
    assert_eq!(data["tables"].as_array().unwrap().len(), 18);

    let (_, body) = get(&app, "/api/sync?since=1").await;
    assert_eq!(body["data"]["events"].as_array().unwrap().len(), 1);

    let (_, body) = get(&app, "/api/sync?since=5").await;
    assert_eq!(body["data"]["requires_full_sync"], true);
}
