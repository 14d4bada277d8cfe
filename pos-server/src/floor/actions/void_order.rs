//! VoidOrder command handler
//!
//! Administrative correction for an order settled in error: it becomes
//! CANCELLED and unpaid, a PAID payment is marked REFUNDED. Table state is
//! not touched and the table is not re-opened.

use async_trait::async_trait;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use shared::order::{EventPayload, FloorEvent, OrderStatus, PaymentStatus};

/// VoidOrder action
#[derive(Debug, Clone)]
pub struct VoidOrderAction {
    pub order_id: String,
}

#[async_trait(?Send)]
impl CommandHandler for VoidOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        let mut order = ctx.load_order(&self.order_id)?;
        if !order.is_paid && order.status != OrderStatus::Served {
            return Err(FloorError::OrderNotSettled(format!(
                "订单 {} 未支付也未上菜，请使用取消",
                order.order_code
            )));
        }

        let refunded = order.payment_status == PaymentStatus::Paid;
        if refunded {
            order.payment_status = PaymentStatus::Refunded;
        }
        order.is_paid = false;
        order.force_terminal(OrderStatus::Cancelled);
        order.updated_at = metadata.timestamp;
        ctx.save_order(order);

        let event = ctx.emit(
            metadata,
            &self.order_id,
            EventPayload::OrderVoided {
                order_id: self.order_id.clone(),
                refunded,
            },
        );
        Ok(vec![event])
    }
}
