//! SetOrderStatus command handler
//!
//! Staff override of the order status. SERVED and CANCELLED are terminal and
//! propagate to every item; other statuses are set as given and feed the
//! prep-time metric.

use async_trait::async_trait;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use shared::order::{EventPayload, FloorEvent, OrderStatus};

/// SetOrderStatus action
#[derive(Debug, Clone)]
pub struct SetOrderStatusAction {
    pub order_id: String,
    pub status: OrderStatus,
}

#[async_trait(?Send)]
impl CommandHandler for SetOrderStatusAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        let mut order = ctx.load_order(&self.order_id)?;
        super::ensure_open(&order)?;

        if order.status == self.status {
            return Ok(vec![]);
        }

        let from = order.status;
        if self.status.is_terminal() {
            order.force_terminal(self.status);
        } else {
            order.status = self.status;
            order.track_prep_time(from, metadata.timestamp);
        }
        order.updated_at = metadata.timestamp;

        let prep_time_minutes = if self.status == OrderStatus::Ready {
            order.prep_time_minutes
        } else {
            None
        };
        ctx.save_order(order);

        let event = ctx.emit(
            metadata,
            &self.order_id,
            EventPayload::OrderStatusChanged {
                order_id: self.order_id.clone(),
                from,
                to: self.status,
                prep_time_minutes,
            },
        );
        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor::actions::test_support::*;
    use crate::floor::storage::FloorStorage;
    use shared::order::ItemStatus;

    fn set(status: OrderStatus) -> SetOrderStatusAction {
        SetOrderStatusAction {
            order_id: "order-1".to_string(),
            status,
        }
    }

    #[tokio::test]
    async fn test_served_propagates_to_items() {
        let storage = FloorStorage::open_in_memory().unwrap();
        seed_order(&storage, &open_order("order-1", "t1"));

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        set(OrderStatus::Served)
            .execute(&mut ctx, &create_test_metadata())
            .await
            .unwrap();

        let order = ctx.load_order("order-1").unwrap();
        assert_eq!(order.status, OrderStatus::Served);
        assert!(order.items.iter().all(|i| i.status == ItemStatus::Served));
    }

    #[tokio::test]
    async fn test_preparing_to_ready_records_minutes() {
        let storage = FloorStorage::open_in_memory().unwrap();
        seed_order(&storage, &open_order("order-1", "t1"));

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let mut metadata = create_test_metadata();
        set(OrderStatus::Preparing)
            .execute(&mut ctx, &metadata)
            .await
            .unwrap();

        metadata.timestamp += 25 * 60_000 + 59_000;
        let events = set(OrderStatus::Ready)
            .execute(&mut ctx, &metadata)
            .await
            .unwrap();
        match &events[0].payload {
            EventPayload::OrderStatusChanged {
                prep_time_minutes, ..
            } => assert_eq!(*prep_time_minutes, Some(25)),
            other => panic!("unexpected payload {other:?}"),
        }
        assert_eq!(ctx.load_order("order-1").unwrap().prep_time_minutes, Some(25));
    }

    #[tokio::test]
    async fn test_terminal_order_rejects_changes() {
        let storage = FloorStorage::open_in_memory().unwrap();
        let mut order = open_order("order-1", "t1");
        order.force_terminal(OrderStatus::Served);
        seed_order(&storage, &order);

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let result = set(OrderStatus::Confirmed)
            .execute(&mut ctx, &create_test_metadata())
            .await;
        assert!(matches!(result, Err(FloorError::OrderAlreadyServed(_))));
    }

    #[tokio::test]
    async fn test_same_status_is_noop() {
        let storage = FloorStorage::open_in_memory().unwrap();
        seed_order(&storage, &open_order("order-1", "t1"));
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let events = set(OrderStatus::Pending)
            .execute(&mut ctx, &create_test_metadata())
            .await
            .unwrap();
        assert!(events.is_empty());
    }
}
