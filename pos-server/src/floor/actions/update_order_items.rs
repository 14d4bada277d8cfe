//! UpdateOrderItems command handler
//!
//! The waiter resubmits the whole cart of an open order. Requested lines are
//! matched against existing lines by `(menu_item_id, note)` in order:
//! matched lines keep their id, price snapshot and kitchen status, extra
//! quantity becomes a new PENDING line, and unmatched existing lines are
//! dropped. Only new lines are checked against the menu snapshot, so an item
//! that went unavailable after it was ordered does not block an edit.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use crate::order_money;
use shared::models::MenuItem;
use shared::order::{EventPayload, FloorEvent, ItemStatus, LineRequest, OrderItem};

/// UpdateOrderItems action
#[derive(Debug, Clone)]
pub struct UpdateOrderItemsAction {
    pub order_id: String,
    pub items: Vec<LineRequest>,
    /// Menu items referenced by `items`, injected by FloorManager
    pub menu_items: HashMap<String, MenuItem>,
}

impl UpdateOrderItemsAction {
    fn new_line(&self, request: &LineRequest, quantity: u32) -> Result<OrderItem, FloorError> {
        let menu_item = self
            .menu_items
            .get(&request.menu_item_id)
            .ok_or_else(|| FloorError::MenuItemNotFound(request.menu_item_id.clone()))?;
        if !menu_item.is_available {
            return Err(FloorError::MenuItemUnavailable(menu_item.name.clone()));
        }
        Ok(OrderItem {
            id: uuid::Uuid::new_v4().to_string(),
            menu_item_id: menu_item.id.clone(),
            name: menu_item.name.clone(),
            price: menu_item.price,
            quantity,
            note: request.note.clone(),
            status: ItemStatus::Pending,
        })
    }

    /// Resulting line list plus the number of lines added
    fn merge_lines(&self, existing: &[OrderItem]) -> Result<(Vec<OrderItem>, usize), FloorError> {
        if self.items.is_empty() {
            return Err(FloorError::EmptyOrder);
        }
        let mut used = vec![false; existing.len()];
        let mut kept = Vec::with_capacity(self.items.len());
        let mut added = Vec::new();

        for request in &self.items {
            if request.quantity == 0 {
                return Err(FloorError::InvalidQuantity(format!(
                    "quantity for {} must be at least 1",
                    request.menu_item_id
                )));
            }
            let mut remaining = request.quantity;
            for (idx, line) in existing.iter().enumerate() {
                if remaining == 0 {
                    break;
                }
                if used[idx] || line.menu_item_id != request.menu_item_id || line.note != request.note
                {
                    continue;
                }
                used[idx] = true;
                let mut line = line.clone();
                line.quantity = line.quantity.min(remaining);
                remaining -= line.quantity;
                kept.push(line);
            }
            if remaining > 0 {
                added.push(self.new_line(request, remaining)?);
            }
        }

        let added_count = added.len();
        kept.extend(added);
        Ok((kept, added_count))
    }
}

#[async_trait(?Send)]
impl CommandHandler for UpdateOrderItemsAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        let mut order = ctx.load_order(&self.order_id)?;
        super::ensure_open(&order)?;
        if order.is_paid {
            return Err(FloorError::OrderAlreadyPaid(order.id.clone()));
        }

        let (items, added) = self.merge_lines(&order.items)?;
        if items == order.items {
            return Ok(vec![]);
        }
        let kept: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
        let removed = order
            .items
            .iter()
            .filter(|i| !kept.contains(i.id.as_str()))
            .count();

        order.items = items;
        order_money::recalculate_totals(&mut order);
        order.refresh_status(metadata.timestamp);
        order.updated_at = metadata.timestamp;

        let payload = EventPayload::OrderItemsUpdated {
            order_id: order.id.clone(),
            added,
            removed,
            item_count: order.items.len(),
            total: order.total,
            order_status: order.status,
        };
        ctx.save_order(order);

        let event = ctx.emit(metadata, &self.order_id, payload);
        Ok(vec![event])
    }
}
