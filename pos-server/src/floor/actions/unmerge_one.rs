//! UnmergeOne command handler
//!
//! Detaches a single member from a merge. The master loses the member's
//! original capacity; if no members remain the master reverts completely.
//! Master and member are updated in the same transaction.

use async_trait::async_trait;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use shared::models::TableGrouping;
use shared::order::{EventPayload, FloorEvent};

/// UnmergeOne action
#[derive(Debug, Clone)]
pub struct UnmergeOneAction {
    pub master_id: String,
    pub table_id: String,
}

#[async_trait(?Send)]
impl CommandHandler for UnmergeOneAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        let mut master = ctx.load_table(&self.master_id)?;
        let (mut members, original_capacity) = match &master.grouping {
            TableGrouping::MergeMaster {
                members,
                original_capacity,
            } => (members.clone(), *original_capacity),
            _ => return Err(FloorError::TableNotMerged(master.number.clone())),
        };
        if !members.contains(&self.table_id) {
            return Err(FloorError::TableNotMerged(format!(
                "桌台 {} 不属于 {} 的合并组",
                self.table_id, master.number
            )));
        }

        let mut member = ctx.load_table(&self.table_id)?;
        let member_capacity = member.original_capacity().unwrap_or(member.capacity);

        members.retain(|id| id != &self.table_id);
        if members.is_empty() {
            // Last member gone: same as a full unmerge on the master side
            let current_order_id = master.current_order_id.take();
            let status = master.status;
            master.release();
            master.current_order_id = current_order_id;
            master.status = status;
        } else {
            master.capacity = master.capacity.saturating_sub(member_capacity);
            master.grouping = TableGrouping::MergeMaster {
                members,
                original_capacity,
            };
        }
        let master_capacity = master.capacity;
        member.release();

        ctx.save_table(master);
        ctx.save_table(member);

        let event = ctx.emit(
            metadata,
            &self.master_id,
            EventPayload::TableUnmergedOne {
                master_id: self.master_id.clone(),
                table_id: self.table_id.clone(),
                master_capacity,
            },
        );
        Ok(vec![event])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::floor::actions::MergeTablesAction;
    use crate::floor::actions::test_support::*;
    use crate::floor::storage::FloorStorage;
    use shared::models::{DiningTable, TableStatus};

    async fn merged_group(ctx: &mut CommandContext<'_>) {
        MergeTablesAction {
            master_id: "t5".to_string(),
            other_ids: vec!["t6".to_string(), "t7".to_string()],
        }
        .execute(ctx, &create_test_metadata())
        .await
        .unwrap();
    }

    fn seed(storage: &FloorStorage) {
        seed_tables(
            storage,
            &[
                DiningTable::new("t5", "05", 2),
                DiningTable::new("t6", "06", 4),
                DiningTable::new("t7", "07", 3),
            ],
        );
    }

    #[tokio::test]
    async fn test_unmerge_one_preserves_remainder() {
        let storage = FloorStorage::open_in_memory().unwrap();
        seed(&storage);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        merged_group(&mut ctx).await;

        let events = UnmergeOneAction {
            master_id: "t5".to_string(),
            table_id: "t6".to_string(),
        }
        .execute(&mut ctx, &create_test_metadata())
        .await
        .unwrap();
        assert_eq!(
            events[0].payload,
            EventPayload::TableUnmergedOne {
                master_id: "t5".to_string(),
                table_id: "t6".to_string(),
                master_capacity: 5,
            }
        );

        let master = ctx.load_table("t5").unwrap();
        assert_eq!(master.capacity, 5);
        assert_eq!(master.merged_with(), &["t7".to_string()]);

        let released = ctx.load_table("t6").unwrap();
        assert!(released.is_primitive());
        assert_eq!(released.status, TableStatus::Available);
        assert_eq!(released.capacity, 4);

        let still = ctx.load_table("t7").unwrap();
        assert_eq!(still.status, TableStatus::Merged);
        assert_eq!(still.master_table_id(), Some("t5"));
    }

    #[tokio::test]
    async fn test_unmerge_last_member_reverts_master() {
        let storage = FloorStorage::open_in_memory().unwrap();
        seed(&storage);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        merged_group(&mut ctx).await;

        let metadata = create_test_metadata();
        for id in ["t6", "t7"] {
            UnmergeOneAction {
                master_id: "t5".to_string(),
                table_id: id.to_string(),
            }
            .execute(&mut ctx, &metadata)
            .await
            .unwrap();
        }

        let master = ctx.load_table("t5").unwrap();
        assert!(master.is_primitive());
        assert_eq!(master.capacity, 2);
        assert_eq!(master.original_capacity(), None);
    }

    #[tokio::test]
    async fn test_unmerge_last_member_keeps_open_order() {
        let storage = FloorStorage::open_in_memory().unwrap();
        let mut master = occupied("t5", "05", 6, "order-1");
        master.grouping = TableGrouping::MergeMaster {
            members: vec!["t6".to_string()],
            original_capacity: 2,
        };
        let mut member = DiningTable::new("t6", "06", 4);
        member.status = TableStatus::Merged;
        member.grouping = TableGrouping::MergeMember {
            master_id: "t5".to_string(),
            original_capacity: 4,
        };
        seed_tables(&storage, &[master, member]);

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        UnmergeOneAction {
            master_id: "t5".to_string(),
            table_id: "t6".to_string(),
        }
        .execute(&mut ctx, &create_test_metadata())
        .await
        .unwrap();

        let master = ctx.load_table("t5").unwrap();
        assert_eq!(master.capacity, 2);
        assert_eq!(master.status, TableStatus::Occupied);
        assert_eq!(master.current_order_id.as_deref(), Some("order-1"));
    }

    #[tokio::test]
    async fn test_unmerge_non_member_fails() {
        let storage = FloorStorage::open_in_memory().unwrap();
        seed(&storage);
        seed_tables(&storage, &[DiningTable::new("t8", "08", 4)]);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        merged_group(&mut ctx).await;

        let result = UnmergeOneAction {
            master_id: "t5".to_string(),
            table_id: "t8".to_string(),
        }
        .execute(&mut ctx, &create_test_metadata())
        .await;
        assert!(matches!(result, Err(FloorError::TableNotMerged(_))));
    }
}
