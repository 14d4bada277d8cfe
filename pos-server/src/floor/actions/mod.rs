//! Command action implementations
//!
//! Each action implements the `CommandHandler` trait and handles
//! one specific floor command.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use shared::order::{FloorCommand, FloorCommandPayload, FloorEvent, Order, OrderStatus};

mod apply_discount;
mod cancel_order;
mod finalize_bill;
mod merge_tables;
mod pay_order;
pub mod place_order;
mod reassign_table;
mod set_order_status;
mod set_table_status;
pub mod split_table;
mod unmerge_all;
mod unmerge_one;
mod unsplit_table;
mod update_item_status;
mod update_order_items;
mod void_order;

#[cfg(test)]
pub(crate) mod test_support;

pub use apply_discount::ApplyDiscountAction;
pub use cancel_order::CancelOrderAction;
pub use finalize_bill::FinalizeBillAction;
pub use merge_tables::MergeTablesAction;
pub use pay_order::PayOrderAction;
pub use place_order::{PlaceOrderAction, generate_order_code};
pub use reassign_table::ReassignTableAction;
pub use set_order_status::SetOrderStatusAction;
pub use set_table_status::SetTableStatusAction;
pub use split_table::{SplitTableAction, child_table_id};
pub use unmerge_all::UnmergeAllAction;
pub use unmerge_one::UnmergeOneAction;
pub use unsplit_table::UnsplitTableAction;
pub use update_item_status::UpdateItemStatusAction;
pub use update_order_items::UpdateOrderItemsAction;
pub use void_order::VoidOrderAction;

/// Kitchen-facing operations only apply to orders that are not terminal
pub(crate) fn ensure_open(order: &Order) -> Result<(), FloorError> {
    match order.status {
        OrderStatus::Cancelled => Err(FloorError::OrderAlreadyCancelled(order.id.clone())),
        OrderStatus::Served => Err(FloorError::OrderAlreadyServed(order.id.clone())),
        _ => Ok(()),
    }
}

/// CommandAction enum - dispatches to concrete action implementations
pub enum CommandAction {
    SetTableStatus(SetTableStatusAction),
    SplitTable(SplitTableAction),
    UnsplitTable(UnsplitTableAction),
    MergeTables(MergeTablesAction),
    UnmergeAll(UnmergeAllAction),
    UnmergeOne(UnmergeOneAction),
    ReassignTable(ReassignTableAction),
    PlaceOrder(PlaceOrderAction),
    UpdateOrderItems(UpdateOrderItemsAction),
    UpdateItemStatus(UpdateItemStatusAction),
    SetOrderStatus(SetOrderStatusAction),
    ApplyDiscount(ApplyDiscountAction),
    PayOrder(PayOrderAction),
    CancelOrder(CancelOrderAction),
    FinalizeBill(FinalizeBillAction),
    VoidOrder(VoidOrderAction),
}

/// Manual implementation of CommandHandler for CommandAction
#[async_trait(?Send)]
impl CommandHandler for CommandAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        match self {
            CommandAction::SetTableStatus(action) => action.execute(ctx, metadata).await,
            CommandAction::SplitTable(action) => action.execute(ctx, metadata).await,
            CommandAction::UnsplitTable(action) => action.execute(ctx, metadata).await,
            CommandAction::MergeTables(action) => action.execute(ctx, metadata).await,
            CommandAction::UnmergeAll(action) => action.execute(ctx, metadata).await,
            CommandAction::UnmergeOne(action) => action.execute(ctx, metadata).await,
            CommandAction::ReassignTable(action) => action.execute(ctx, metadata).await,
            CommandAction::PlaceOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::UpdateOrderItems(action) => action.execute(ctx, metadata).await,
            CommandAction::UpdateItemStatus(action) => action.execute(ctx, metadata).await,
            CommandAction::SetOrderStatus(action) => action.execute(ctx, metadata).await,
            CommandAction::ApplyDiscount(action) => action.execute(ctx, metadata).await,
            CommandAction::PayOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::CancelOrder(action) => action.execute(ctx, metadata).await,
            CommandAction::FinalizeBill(action) => action.execute(ctx, metadata).await,
            CommandAction::VoidOrder(action) => action.execute(ctx, metadata).await,
        }
    }
}

/// Convert FloorCommand to CommandAction
///
/// This is the ONLY place with a match on FloorCommandPayload. PlaceOrder and
/// UpdateOrderItems leave `menu_items` empty; FloorManager injects the
/// catalog snapshot.
impl From<&FloorCommand> for CommandAction {
    fn from(cmd: &FloorCommand) -> Self {
        match &cmd.payload {
            FloorCommandPayload::SetTableStatus { table_id, status } => {
                CommandAction::SetTableStatus(SetTableStatusAction {
                    table_id: table_id.clone(),
                    status: *status,
                })
            }
            FloorCommandPayload::SplitTable { table_id, parts } => {
                CommandAction::SplitTable(SplitTableAction {
                    table_id: table_id.clone(),
                    parts: *parts,
                })
            }
            FloorCommandPayload::UnsplitTable { table_id } => {
                CommandAction::UnsplitTable(UnsplitTableAction {
                    table_id: table_id.clone(),
                })
            }
            FloorCommandPayload::MergeTables {
                master_id,
                other_ids,
            } => CommandAction::MergeTables(MergeTablesAction {
                master_id: master_id.clone(),
                other_ids: other_ids.clone(),
            }),
            FloorCommandPayload::UnmergeAll { master_id } => {
                CommandAction::UnmergeAll(UnmergeAllAction {
                    master_id: master_id.clone(),
                })
            }
            FloorCommandPayload::UnmergeOne {
                master_id,
                table_id,
            } => CommandAction::UnmergeOne(UnmergeOneAction {
                master_id: master_id.clone(),
                table_id: table_id.clone(),
            }),
            FloorCommandPayload::ReassignTable {
                from_table_id,
                to_table_id,
            } => CommandAction::ReassignTable(ReassignTableAction {
                from_table_id: from_table_id.clone(),
                to_table_id: to_table_id.clone(),
            }),
            FloorCommandPayload::PlaceOrder { table_id, items } => {
                CommandAction::PlaceOrder(PlaceOrderAction {
                    table_id: table_id.clone(),
                    items: items.clone(),
                    menu_items: HashMap::new(), // Injected by FloorManager
                })
            }
            FloorCommandPayload::UpdateOrderItems { order_id, items } => {
                CommandAction::UpdateOrderItems(UpdateOrderItemsAction {
                    order_id: order_id.clone(),
                    items: items.clone(),
                    menu_items: HashMap::new(), // Injected by FloorManager
                })
            }
            FloorCommandPayload::UpdateItemStatus {
                order_id,
                item_id,
                status,
            } => CommandAction::UpdateItemStatus(UpdateItemStatusAction {
                order_id: order_id.clone(),
                item_id: item_id.clone(),
                status: *status,
            }),
            FloorCommandPayload::SetOrderStatus { order_id, status } => {
                CommandAction::SetOrderStatus(SetOrderStatusAction {
                    order_id: order_id.clone(),
                    status: *status,
                })
            }
            FloorCommandPayload::ApplyDiscount {
                order_id,
                kind,
                value,
            } => CommandAction::ApplyDiscount(ApplyDiscountAction {
                order_id: order_id.clone(),
                kind: *kind,
                value: *value,
            }),
            FloorCommandPayload::PayOrder {
                order_id,
                method,
                amount_tendered,
            } => CommandAction::PayOrder(PayOrderAction {
                order_id: order_id.clone(),
                method: *method,
                amount_tendered: *amount_tendered,
            }),
            FloorCommandPayload::CancelOrder { order_id } => {
                CommandAction::CancelOrder(CancelOrderAction {
                    order_id: order_id.clone(),
                })
            }
            FloorCommandPayload::FinalizeBill { table_id } => {
                CommandAction::FinalizeBill(FinalizeBillAction {
                    table_id: table_id.clone(),
                })
            }
            FloorCommandPayload::VoidOrder { order_id } => {
                CommandAction::VoidOrder(VoidOrderAction {
                    order_id: order_id.clone(),
                })
            }
        }
    }
}
