//! SetTableStatus command handler
//!
//! Manual staff override between AVAILABLE, OCCUPIED and RESERVED.
//! Moving to AVAILABLE clears the table's current order reference.

use async_trait::async_trait;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use shared::models::{TableGrouping, TableStatus};
use shared::order::{EventPayload, FloorEvent};

/// SetTableStatus action
#[derive(Debug, Clone)]
pub struct SetTableStatusAction {
    pub table_id: String,
    pub status: TableStatus,
}

#[async_trait(?Send)]
impl CommandHandler for SetTableStatusAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        // MERGED is a role owned by merge/unmerge
        if self.status == TableStatus::Merged {
            return Err(FloorError::InvalidTableStatus(
                "MERGED can only be set by merging tables".to_string(),
            ));
        }

        let mut table = ctx.load_table(&self.table_id)?;

        // Split parents and merge members take their status from the grouping
        match &table.grouping {
            TableGrouping::SplitParent { .. } => {
                return Err(FloorError::TableGrouped(format!(
                    "桌台 {} 已拆分，请先合并子桌",
                    table.number
                )));
            }
            TableGrouping::MergeMember { master_id, .. } => {
                return Err(FloorError::TableGrouped(format!(
                    "桌台 {} 已并入 {}",
                    table.number, master_id
                )));
            }
            _ => {}
        }

        let clears_order = self.status == TableStatus::Available && table.current_order_id.is_some();
        if table.status == self.status && !clears_order {
            return Ok(vec![]);
        }

        let from = table.status;
        table.status = self.status;
        if self.status == TableStatus::Available {
            table.current_order_id = None;
        }
        ctx.save_table(table);

        let event = ctx.emit(
            metadata,
            &self.table_id,
            EventPayload::TableStatusChanged {
                table_id: self.table_id.clone(),
                from,
                to: self.status,
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
    use shared::models::DiningTable;

    #[tokio::test]
    async fn test_reserve_available_table() {
        let storage = FloorStorage::open_in_memory().unwrap();
        seed_tables(&storage, &[DiningTable::new("t1", "01", 2)]);

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = SetTableStatusAction {
            table_id: "t1".to_string(),
            status: TableStatus::Reserved,
        };
        let events = action
            .execute(&mut ctx, &create_test_metadata())
            .await
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].sequence, 1);
        assert_eq!(
            events[0].payload,
            EventPayload::TableStatusChanged {
                table_id: "t1".to_string(),
                from: TableStatus::Available,
                to: TableStatus::Reserved,
            }
        );
        assert_eq!(ctx.load_table("t1").unwrap().status, TableStatus::Reserved);
    }

    #[tokio::test]
    async fn test_available_clears_current_order() {
        let storage = FloorStorage::open_in_memory().unwrap();
        seed_tables(&storage, &[occupied("t1", "01", 2, "order-1")]);

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = SetTableStatusAction {
            table_id: "t1".to_string(),
            status: TableStatus::Available,
        };
        action
            .execute(&mut ctx, &create_test_metadata())
            .await
            .unwrap();

        let table = ctx.load_table("t1").unwrap();
        assert_eq!(table.status, TableStatus::Available);
        assert!(table.current_order_id.is_none());
    }

    #[tokio::test]
    async fn test_same_status_is_noop() {
        let storage = FloorStorage::open_in_memory().unwrap();
        seed_tables(&storage, &[DiningTable::new("t1", "01", 2)]);

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = SetTableStatusAction {
            table_id: "t1".to_string(),
            status: TableStatus::Available,
        };
        let events = action
            .execute(&mut ctx, &create_test_metadata())
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_table_fails() {
        let storage = FloorStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = SetTableStatusAction {
            table_id: "t99".to_string(),
            status: TableStatus::Reserved,
        };
        let result = action.execute(&mut ctx, &create_test_metadata()).await;
        assert!(matches!(result, Err(FloorError::TableNotFound(_))));
    }

    #[tokio::test]
    async fn test_merged_status_rejected() {
        let storage = FloorStorage::open_in_memory().unwrap();
        seed_tables(&storage, &[DiningTable::new("t1", "01", 2)]);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = SetTableStatusAction {
            table_id: "t1".to_string(),
            status: TableStatus::Merged,
        };
        let result = action.execute(&mut ctx, &create_test_metadata()).await;
        assert!(matches!(result, Err(FloorError::InvalidTableStatus(_))));
    }

    #[tokio::test]
    async fn test_split_parent_rejected() {
        let storage = FloorStorage::open_in_memory().unwrap();
        let mut parent = DiningTable::new("t12", "12", 8);
        parent.status = TableStatus::Occupied;
        parent.grouping = TableGrouping::SplitParent {
            children: vec!["split-t12-0".to_string(), "split-t12-1".to_string()],
            original_capacity: 8,
        };
        seed_tables(&storage, &[parent]);

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let action = SetTableStatusAction {
            table_id: "t12".to_string(),
            status: TableStatus::Available,
        };
        let result = action.execute(&mut ctx, &create_test_metadata()).await;
        assert!(matches!(result, Err(FloorError::TableGrouped(_))));
    }
}
