//! UnsplitTable command handler
//!
//! Removes every child of a split table and restores the parent to an
//! AVAILABLE primitive table with its pre-split capacity. Refused while any
//! child still holds an order.

use async_trait::async_trait;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use shared::models::TableGrouping;
use shared::order::{EventPayload, FloorEvent};

/// UnsplitTable action
#[derive(Debug, Clone)]
pub struct UnsplitTableAction {
    pub table_id: String,
}

#[async_trait(?Send)]
impl CommandHandler for UnsplitTableAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        let mut parent = ctx.load_table(&self.table_id)?;
        let children = match &parent.grouping {
            TableGrouping::SplitParent { children, .. } => children.clone(),
            _ => return Err(FloorError::TableNotSplit(parent.number.clone())),
        };

        // Validate every child before removing any
        for child_id in &children {
            if let Some(child) = ctx.find_table(child_id)?
                && child.current_order_id.is_some()
            {
                return Err(FloorError::SplitChildOccupied(format!(
                    "子桌 {} 仍有未结订单",
                    child.number
                )));
            }
        }

        for child_id in &children {
            ctx.remove_table(child_id);
        }
        parent.release();
        let capacity = parent.capacity;
        ctx.save_table(parent);

        let event = ctx.emit(
            metadata,
            &self.table_id,
            EventPayload::TableUnsplit {
                table_id: self.table_id.clone(),
                removed_children: children,
                capacity,
            },
        );
        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor::actions::SplitTableAction;
    use crate::floor::actions::test_support::*;
    use crate::floor::storage::FloorStorage;
    use shared::models::{DiningTable, TableStatus};

    #[tokio::test]
    async fn test_split_then_unsplit_round_trip() {
        let storage = FloorStorage::open_in_memory().unwrap();
        seed_tables(&storage, &[DiningTable::new("t13", "13", 10)]);

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let metadata = create_test_metadata();
        SplitTableAction {
            table_id: "t13".to_string(),
            parts: 3,
        }
        .execute(&mut ctx, &metadata)
        .await
        .unwrap();

        let events = UnsplitTableAction {
            table_id: "t13".to_string(),
        }
        .execute(&mut ctx, &metadata)
        .await
        .unwrap();
        assert_eq!(events[0].sequence, 2);

        let parent = ctx.load_table("t13").unwrap();
        assert!(parent.is_primitive());
        assert_eq!(parent.capacity, 10);
        assert_eq!(parent.status, TableStatus::Available);
        for i in 0..3 {
            assert!(ctx.find_table(&format!("split-t13-{i}")).unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_unsplit_primitive_fails() {
        let storage = FloorStorage::open_in_memory().unwrap();
        seed_tables(&storage, &[DiningTable::new("t1", "01", 2)]);

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let result = UnsplitTableAction {
            table_id: "t1".to_string(),
        }
        .execute(&mut ctx, &create_test_metadata())
        .await;
        assert!(matches!(result, Err(FloorError::TableNotSplit(_))));
    }

    #[tokio::test]
    async fn test_unsplit_blocked_by_occupied_child() {
        let storage = FloorStorage::open_in_memory().unwrap();
        let mut parent = DiningTable::new("t12", "12", 8);
        parent.status = TableStatus::Occupied;
        parent.grouping = TableGrouping::SplitParent {
            children: vec!["split-t12-0".to_string(), "split-t12-1".to_string()],
            original_capacity: 8,
        };
        let mut busy = occupied("split-t12-0", "12.1", 4, "order-1");
        busy.grouping = TableGrouping::SplitChild {
            parent_id: "t12".to_string(),
        };
        let mut idle = DiningTable::new("split-t12-1", "12.2", 4);
        idle.grouping = TableGrouping::SplitChild {
            parent_id: "t12".to_string(),
        };
        seed_tables(&storage, &[parent, busy, idle]);

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let result = UnsplitTableAction {
            table_id: "t12".to_string(),
        }
        .execute(&mut ctx, &create_test_metadata())
        .await;
        assert!(matches!(result, Err(FloorError::SplitChildOccupied(_))));
        assert!(ctx.find_table("split-t12-1").unwrap().is_some());
    }
}
