//! PayOrder command handler
//!
//! Settles an order: the tendered amount must cover the total. On success
//! the order is PAID and SERVED and the change is reported in the event.

use async_trait::async_trait;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use crate::order_money;
use shared::order::{EventPayload, FloorEvent, OrderStatus, PaymentMethod, PaymentStatus};

/// PayOrder action
#[derive(Debug, Clone)]
pub struct PayOrderAction {
    pub order_id: String,
    pub method: PaymentMethod,
    pub amount_tendered: f64,
}

#[async_trait(?Send)]
impl CommandHandler for PayOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        order_money::validate_tendered(self.amount_tendered)?;

        let mut order = ctx.load_order(&self.order_id)?;
        if order.is_paid {
            return Err(FloorError::OrderAlreadyPaid(self.order_id.clone()));
        }
        if order.status == OrderStatus::Cancelled {
            return Err(FloorError::OrderAlreadyCancelled(self.order_id.clone()));
        }
        if !order_money::is_payment_sufficient(self.amount_tendered, order.total) {
            return Err(FloorError::InsufficientPayment {
                total: order.total,
                tendered: self.amount_tendered,
            });
        }

        let change = order_money::calculate_change(self.amount_tendered, order.total);
        order.is_paid = true;
        order.payment_status = PaymentStatus::Paid;
        order.payment_method = Some(self.method);
        order.force_terminal(OrderStatus::Served);
        order.updated_at = metadata.timestamp;

        let payload = EventPayload::OrderPaid {
            order_id: self.order_id.clone(),
            method: self.method,
            total: order.total,
            amount_tendered: self.amount_tendered,
            change,
        };
        ctx.save_order(order);

        let event = ctx.emit(metadata, &self.order_id, payload);
        Ok(vec![event])
    }
}
