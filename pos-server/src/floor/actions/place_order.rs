//! PlaceOrder command handler
//!
//! Creates an order against one orderable table. Every line is validated
//! against the menu snapshot injected by the manager; the first missing or
//! unavailable item rejects the whole order. Name and price are copied onto
//! the line so later menu edits never change a placed order.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use crate::order_money;
use shared::models::{MenuItem, TableStatus};
use shared::order::{
    EventPayload, FloorEvent, ItemStatus, LineRequest, Order, OrderItem, OrderStatus,
    PaymentStatus,
};

/// PlaceOrder action
#[derive(Debug, Clone)]
pub struct PlaceOrderAction {
    pub table_id: String,
    pub items: Vec<LineRequest>,
    /// Menu items referenced by `items`, injected by FloorManager
    pub menu_items: HashMap<String, MenuItem>,
}

/// Human-readable order code: `ORD{yymmdd}{last 6 digits of millis}{counter}`
pub fn generate_order_code(timestamp: i64, count: u64) -> String {
    let date = chrono::DateTime::from_timestamp_millis(timestamp)
        .unwrap_or_else(chrono::Utc::now)
        .format("%y%m%d");
    format!(
        "ORD{}{:06}{:04}",
        date,
        timestamp.rem_euclid(1_000_000),
        count % 10_000
    )
}

impl PlaceOrderAction {
    fn build_lines(&self) -> Result<Vec<OrderItem>, FloorError> {
        if self.items.is_empty() {
            return Err(FloorError::EmptyOrder);
        }
        let mut lines = Vec::with_capacity(self.items.len());
        for request in &self.items {
            if request.quantity == 0 {
                return Err(FloorError::InvalidQuantity(format!(
                    "quantity for {} must be at least 1",
                    request.menu_item_id
                )));
            }
            let menu_item = self
                .menu_items
                .get(&request.menu_item_id)
                .ok_or_else(|| FloorError::MenuItemNotFound(request.menu_item_id.clone()))?;
            if !menu_item.is_available {
                return Err(FloorError::MenuItemUnavailable(menu_item.name.clone()));
            }
            lines.push(OrderItem {
                id: uuid::Uuid::new_v4().to_string(),
                menu_item_id: menu_item.id.clone(),
                name: menu_item.name.clone(),
                price: menu_item.price,
                quantity: request.quantity,
                note: request.note.clone(),
                status: ItemStatus::Pending,
            });
        }
        Ok(lines)
    }
}

#[async_trait(?Send)]
impl CommandHandler for PlaceOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        // 1. Table must be a free orderable unit
        let mut table = ctx.load_table(&self.table_id)?;
        if !table.is_orderable() {
            return Err(FloorError::TableGrouped(format!(
                "桌台 {} 不能直接下单",
                table.number
            )));
        }
        if let Some(existing) = &table.current_order_id {
            return Err(FloorError::TableOccupied(format!(
                "桌台 {} 已有订单 {}",
                table.number, existing
            )));
        }

        // 2. Lines
        let items = self.build_lines()?;

        // 3. Build the order
        let count = ctx.next_order_count()?;
        let mut order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            order_code: generate_order_code(metadata.timestamp, count),
            table_id: table.id.clone(),
            table_number: table.number.clone(),
            items,
            subtotal: 0.0,
            tax: 0.0,
            discount: 0.0,
            total: 0.0,
            discount_kind: None,
            discount_value: None,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            waiter: metadata.operator(),
            is_paid: false,
            prep_time_minutes: None,
            preparing_since: None,
            created_at: metadata.timestamp,
            updated_at: metadata.timestamp,
            last_sequence: 0,
        };
        order_money::recalculate_totals(&mut order);

        table.status = TableStatus::Occupied;
        table.current_order_id = Some(order.id.clone());

        let payload = EventPayload::OrderPlaced {
            order_id: order.id.clone(),
            order_code: order.order_code.clone(),
            table_id: table.id.clone(),
            table_number: table.number.clone(),
            item_count: order.items.len(),
            total: order.total,
        };
        let order_id = order.id.clone();
        ctx.save_table(table);
        ctx.save_order(order);

        let event = ctx.emit(metadata, &order_id, payload);
        Ok(vec![event])
    }
}
