//! Fixtures shared by the action tests

use crate::floor::storage::FloorStorage;
use crate::floor::traits::CommandMetadata;
use shared::models::{DiningTable, StaffRef, StaffRole, TableStatus};
use shared::order::{ItemStatus, Order, OrderItem, OrderStatus, PaymentStatus};

pub fn create_test_metadata() -> CommandMetadata {
    CommandMetadata {
        command_id: "cmd-1".to_string(),
        operator_id: "w1".to_string(),
        operator_name: "Asha".to_string(),
        operator_role: StaffRole::Waiter,
        timestamp: 1_700_000_000_000,
    }
}

/// Store tables in their own committed transaction
pub fn seed_tables(storage: &FloorStorage, tables: &[DiningTable]) {
    let txn = storage.begin_write().unwrap();
    for table in tables {
        storage.store_table(&txn, table).unwrap();
    }
    txn.commit().unwrap();
}

pub fn seed_order(storage: &FloorStorage, order: &Order) {
    let txn = storage.begin_write().unwrap();
    storage.store_order(&txn, order).unwrap();
    txn.commit().unwrap();
}

pub fn occupied(id: &str, number: &str, capacity: u32, order_id: &str) -> DiningTable {
    let mut table = DiningTable::new(id, number, capacity);
    table.status = TableStatus::Occupied;
    table.current_order_id = Some(order_id.to_string());
    table
}

pub fn line(id: &str, price: f64, quantity: u32) -> OrderItem {
    OrderItem {
        id: id.to_string(),
        menu_item_id: "1".to_string(),
        name: "Margherita Pizza".to_string(),
        price,
        quantity,
        note: None,
        status: ItemStatus::Pending,
    }
}

/// Open order for 2 × 100.00 (subtotal 200, tax 10, total 210)
pub fn open_order(order_id: &str, table_id: &str) -> Order {
    Order {
        id: order_id.to_string(),
        order_code: "ORD2311140000000001".to_string(),
        table_id: table_id.to_string(),
        table_number: "01".to_string(),
        items: vec![line("item-1", 100.0, 2)],
        subtotal: 200.0,
        tax: 10.0,
        discount: 0.0,
        total: 210.0,
        discount_kind: None,
        discount_value: None,
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Unpaid,
        payment_method: None,
        waiter: StaffRef::new("w1", "Asha", StaffRole::Waiter),
        is_paid: false,
        prep_time_minutes: None,
        preparing_since: None,
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_000_000,
        last_sequence: 0,
    }
}
