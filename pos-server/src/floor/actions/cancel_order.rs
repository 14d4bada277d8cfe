//! CancelOrder command handler
//!
//! Cancels an order that has not been served or paid. Every item becomes
//! CANCELLED. The table keeps its reference until the bill is finalized.

use async_trait::async_trait;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use shared::order::{EventPayload, FloorEvent, OrderStatus};

/// CancelOrder action
#[derive(Debug, Clone)]
pub struct CancelOrderAction {
    pub order_id: String,
}

#[async_trait(?Send)]
impl CommandHandler for CancelOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        let mut order = ctx.load_order(&self.order_id)?;
        if order.status == OrderStatus::Served || order.is_paid {
            return Err(FloorError::OrderAlreadyServed(format!(
                "订单 {} 已上菜或已支付，无法取消",
                order.order_code
            )));
        }
        if order.status == OrderStatus::Cancelled {
            return Err(FloorError::OrderAlreadyCancelled(self.order_id.clone()));
        }

        order.force_terminal(OrderStatus::Cancelled);
        order.updated_at = metadata.timestamp;
        ctx.save_order(order);

        let event = ctx.emit(
            metadata,
            &self.order_id,
            EventPayload::OrderCancelled {
                order_id: self.order_id.clone(),
            },
        );
        Ok(vec![event])
    }
}
