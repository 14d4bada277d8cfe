//! ReassignTable command handler
//!
//! Moves the current order of one table to another. The source reverts to
//! AVAILABLE, the destination becomes OCCUPIED with the order attached, and
//! the order's table reference is repointed. Capacity and grouping of both
//! tables are left alone.

use async_trait::async_trait;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use shared::models::TableStatus;
use shared::order::{EventPayload, FloorEvent};

/// ReassignTable action
#[derive(Debug, Clone)]
pub struct ReassignTableAction {
    pub from_table_id: String,
    pub to_table_id: String,
}

#[async_trait(?Send)]
impl CommandHandler for ReassignTableAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        if self.from_table_id == self.to_table_id {
            return Err(FloorError::InvalidRequest(
                "source and destination table are the same".to_string(),
            ));
        }

        let mut source = ctx.load_table(&self.from_table_id)?;
        let order_id = source
            .current_order_id
            .clone()
            .ok_or_else(|| FloorError::TableAlreadyEmpty(source.number.clone()))?;

        // Destination must be an orderable, free unit
        let mut destination = ctx.load_table(&self.to_table_id)?;
        if !destination.is_orderable() {
            return Err(FloorError::TableGrouped(format!(
                "目标桌台 {} 已拆分或已被合并",
                destination.number
            )));
        }
        if destination.status != TableStatus::Available || destination.current_order_id.is_some()
        {
            return Err(FloorError::TableOccupied(format!(
                "目标桌台 {} 已被占用",
                destination.number
            )));
        }

        let mut order = ctx.load_order(&order_id)?;
        order.table_id = destination.id.clone();
        order.table_number = destination.number.clone();
        order.updated_at = metadata.timestamp;

        source.status = TableStatus::Available;
        source.current_order_id = None;
        destination.status = TableStatus::Occupied;
        destination.current_order_id = Some(order_id.clone());

        ctx.save_order(order);
        ctx.save_table(source);
        ctx.save_table(destination);

        let event = ctx.emit(
            metadata,
            &order_id,
            EventPayload::OrderReassigned {
                order_id: order_id.clone(),
                from_table_id: self.from_table_id.clone(),
                to_table_id: self.to_table_id.clone(),
            },
        );
        Ok(vec![event])
    }
}
