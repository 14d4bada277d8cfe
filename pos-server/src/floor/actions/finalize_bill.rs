//! FinalizeBill command handler
//!
//! Closes the bill of a table and unwinds its topology:
//!
//! 1. the current order is marked paid and SERVED (a cancelled order is only
//!    detached);
//! 2. the table and, for a merge master, every member are released to
//!    AVAILABLE primitive tables with their original capacities;
//! 3. for a split child, once every sibling is AVAILABLE without an order
//!    the children are removed and the parent is restored.
//!
//! A table without an order produces no events (explicit no-op).

use async_trait::async_trait;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use shared::models::{TableGrouping, TableStatus};
use shared::order::{EventPayload, FloorEvent, OrderStatus, PaymentStatus};

/// FinalizeBill action
#[derive(Debug, Clone)]
pub struct FinalizeBillAction {
    pub table_id: String,
}

impl FinalizeBillAction {
    /// Recombine the split parent if every child is free again
    fn try_recombine(
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
        parent_id: &str,
    ) -> Result<Option<FloorEvent>, FloorError> {
        let Some(mut parent) = ctx.find_table(parent_id)? else {
            tracing::warn!(parent_id = %parent_id, "Split parent missing, skipping recombine");
            return Ok(None);
        };
        let children = match &parent.grouping {
            TableGrouping::SplitParent { children, .. } => children.clone(),
            _ => return Ok(None),
        };

        for child_id in &children {
            if let Some(child) = ctx.find_table(child_id)?
                && (child.status != TableStatus::Available || child.current_order_id.is_some())
            {
                return Ok(None);
            }
        }

        for child_id in &children {
            ctx.remove_table(child_id);
        }
        parent.release();
        let capacity = parent.capacity;
        ctx.save_table(parent);

        Ok(Some(ctx.emit(
            metadata,
            parent_id,
            EventPayload::SplitRecombined {
                parent_id: parent_id.to_string(),
                removed_children: children,
                capacity,
            },
        )))
    }
}

#[async_trait(?Send)]
impl CommandHandler for FinalizeBillAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        let table = ctx.load_table(&self.table_id)?;
        let Some(order_id) = table.current_order_id.clone() else {
            return Ok(vec![]);
        };

        // 1. Close the order
        let mut order = ctx.load_order(&order_id)?;
        if order.status != OrderStatus::Cancelled {
            if !order.is_paid {
                order.is_paid = true;
                order.payment_status = PaymentStatus::Paid;
            }
            order.force_terminal(OrderStatus::Served);
        }
        order.updated_at = metadata.timestamp;
        ctx.save_order(order);

        // 2. Merge release: the table itself plus any members
        let split_parent = table.parent_id().map(str::to_string);
        let mut released = vec![table.id.clone()];
        for member_id in table.merged_with() {
            if let Some(mut member) = ctx.find_table(member_id)? {
                member.release();
                ctx.save_table(member);
                released.push(member_id.clone());
            }
        }
        let mut table = table;
        if split_parent.is_some() {
            // A child stays linked to its parent until recombination
            table.status = TableStatus::Available;
            table.current_order_id = None;
        } else {
            table.release();
        }
        ctx.save_table(table);

        let mut events = vec![ctx.emit(
            metadata,
            &order_id,
            EventPayload::BillFinalized {
                order_id: order_id.clone(),
                table_id: self.table_id.clone(),
                released_tables: released,
            },
        )];

        // 3. Split recombination, after the release above
        if let Some(parent_id) = split_parent
            && let Some(event) = Self::try_recombine(ctx, metadata, &parent_id)?
        {
            events.push(event);
        }

        Ok(events)
    }
}
