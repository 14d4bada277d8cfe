//! ApplyDiscount command handler
//!
//! Replaces the order discount. The discount is taken from the subtotal only;
//! tax stays on the pre-discount subtotal.

use async_trait::async_trait;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use crate::order_money;
use shared::order::{DiscountKind, EventPayload, FloorEvent, OrderStatus};

/// ApplyDiscount action
#[derive(Debug, Clone)]
pub struct ApplyDiscountAction {
    pub order_id: String,
    pub kind: DiscountKind,
    pub value: f64,
}

#[async_trait(?Send)]
impl CommandHandler for ApplyDiscountAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        let mut order = ctx.load_order(&self.order_id)?;
        if order.is_paid {
            return Err(FloorError::OrderAlreadyPaid(self.order_id.clone()));
        }
        if order.status == OrderStatus::Cancelled {
            return Err(FloorError::OrderAlreadyCancelled(self.order_id.clone()));
        }

        let subtotal = order_money::calculate_subtotal(&order.items);
        order_money::calculate_discount(subtotal, self.kind, self.value)?;

        order.discount_kind = Some(self.kind);
        order.discount_value = Some(self.value);
        order_money::recalculate_totals(&mut order);
        order.updated_at = metadata.timestamp;

        let payload = EventPayload::DiscountApplied {
            order_id: self.order_id.clone(),
            kind: self.kind,
            value: self.value,
            discount: order.discount,
            total: order.total,
        };
        ctx.save_order(order);

        let event = ctx.emit(metadata, &self.order_id, payload);
        Ok(vec![event])
    }
}
