use super::*;
use crate::floor::seed;
use crate::services::catalog_service::CatalogService;
use shared::error::{ErrorCode, ErrorKind};
use shared::models::{StaffRef, StaffRole, TableStatus};
use shared::order::{
    DiscountKind, FloorEventType, ItemStatus, LineRequest, OrderStatus, PaymentMethod,
    PaymentStatus,
};

/// Manager over an in-memory store with the default seating plan and menu
fn create_test_manager() -> FloorManager {
    create_test_manager_with_catalog().0
}

fn create_test_manager_with_catalog() -> (FloorManager, Arc<CatalogService>) {
    let storage = FloorStorage::open_in_memory().unwrap();
    seed::seed_if_empty(&storage).unwrap();
    let catalog = Arc::new(CatalogService::new(storage.clone()));
    catalog.load().unwrap();

    let mut manager = FloorManager::with_storage(storage);
    manager.set_catalog(catalog.clone());
    (manager, catalog)
}

fn waiter() -> StaffRef {
    StaffRef::new("w1", "Asha", StaffRole::Waiter)
}

fn cmd(payload: FloorCommandPayload) -> FloorCommand {
    FloorCommand::new(waiter(), payload)
}

fn run(manager: &FloorManager, payload: FloorCommandPayload) -> CommandResponse {
    manager.execute_command(cmd(payload))
}

/// Run a command with an explicit client timestamp
fn run_at(manager: &FloorManager, payload: FloorCommandPayload, timestamp: i64) -> CommandResponse {
    let mut command = cmd(payload);
    command.timestamp = timestamp;
    manager.execute_command(command)
}

fn assert_money(actual: f64, expected: f64) {
    assert!(
        crate::order_money::money_eq(actual, expected),
        "expected {expected}, got {actual}"
    );
}

/// Run a command that must succeed
fn run_ok(manager: &FloorManager, payload: FloorCommandPayload) -> CommandResponse {
    let name = payload.name();
    let resp = run(manager, payload);
    assert!(resp.success, "{name} failed: {:?}", resp.error);
    resp
}

/// Run a command that must fail, returning its error code
fn run_err(manager: &FloorManager, payload: FloorCommandPayload) -> ErrorCode {
    let name = payload.name();
    let resp = run(manager, payload);
    assert!(!resp.success, "{name} should have failed");
    resp.error.expect("failed response carries an error").code
}

fn table(manager: &FloorManager, id: &str) -> DiningTable {
    manager.get_table(id).unwrap().expect("table exists")
}

fn order(manager: &FloorManager, id: &str) -> Order {
    manager.get_order(id).unwrap().expect("order exists")
}

fn lines(items: &[(&str, u32)]) -> Vec<LineRequest> {
    items
        .iter()
        .map(|(menu_item_id, quantity)| LineRequest {
            menu_item_id: menu_item_id.to_string(),
            quantity: *quantity,
            note: None,
        })
        .collect()
}

/// Place an order and return its id
fn place(manager: &FloorManager, table_id: &str, items: &[(&str, u32)]) -> String {
    let resp = run_ok(
        manager,
        FloorCommandPayload::PlaceOrder {
            table_id: table_id.to_string(),
            items: lines(items),
        },
    );
    resp.order_id.expect("place returns the order id")
}

fn split(table_id: &str, parts: u32) -> FloorCommandPayload {
    FloorCommandPayload::SplitTable {
        table_id: table_id.to_string(),
        parts,
    }
}

fn merge(master_id: &str, others: &[&str]) -> FloorCommandPayload {
    FloorCommandPayload::MergeTables {
        master_id: master_id.to_string(),
        other_ids: others.iter().map(|s| s.to_string()).collect(),
    }
}

fn finalize(table_id: &str) -> FloorCommandPayload {
    FloorCommandPayload::FinalizeBill {
        table_id: table_id.to_string(),
    }
}

fn advance(order_id: &str, item_id: &str, status: ItemStatus) -> FloorCommandPayload {
    FloorCommandPayload::UpdateItemStatus {
        order_id: order_id.to_string(),
        item_id: item_id.to_string(),
        status,
    }
}

fn pay(order_id: &str, amount_tendered: f64) -> FloorCommandPayload {
    FloorCommandPayload::PayOrder {
        order_id: order_id.to_string(),
        method: PaymentMethod::Cash,
        amount_tendered,
    }
}

mod test_billing;
