//! UpdateItemStatus command handler
//!
//! Kitchen sets a line to PENDING, PREPARING or READY (any order, repeat
//! allowed). The order status is then re-derived from its items.

use async_trait::async_trait;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use shared::order::{EventPayload, FloorEvent, ItemStatus};

/// UpdateItemStatus action
#[derive(Debug, Clone)]
pub struct UpdateItemStatusAction {
    pub order_id: String,
    pub item_id: String,
    pub status: ItemStatus,
}

#[async_trait(?Send)]
impl CommandHandler for UpdateItemStatusAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        if !self.status.is_kitchen_stage() {
            return Err(FloorError::InvalidItemStatus(format!(
                "{:?} is set by serving or cancelling the order",
                self.status
            )));
        }

        let mut order = ctx.load_order(&self.order_id)?;
        super::ensure_open(&order)?;

        let item = order
            .find_item_mut(&self.item_id)
            .ok_or_else(|| FloorError::ItemNotFound(self.item_id.clone()))?;
        let from = item.status;
        item.status = self.status;

        order.refresh_status(metadata.timestamp);
        order.updated_at = metadata.timestamp;
        let order_status = order.status;
        ctx.save_order(order);

        let event = ctx.emit(
            metadata,
            &self.order_id,
            EventPayload::ItemStatusUpdated {
                order_id: self.order_id.clone(),
                item_id: self.item_id.clone(),
                from,
                to: self.status,
                order_status,
            },
        );
        Ok(vec![event])
    }
}
