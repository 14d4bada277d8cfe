//! UnmergeAll command handler
//!
//! Releases the master and every member back to AVAILABLE primitive tables
//! with their original capacities. Refused while the master holds an order
//! (finalize releases a billed group instead).

use async_trait::async_trait;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use shared::models::TableGrouping;
use shared::order::{EventPayload, FloorEvent};

/// UnmergeAll action
#[derive(Debug, Clone)]
pub struct UnmergeAllAction {
    pub master_id: String,
}

#[async_trait(?Send)]
impl CommandHandler for UnmergeAllAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        let mut master = ctx.load_table(&self.master_id)?;
        let members = match &master.grouping {
            TableGrouping::MergeMaster { members, .. } => members.clone(),
            _ => return Err(FloorError::TableNotMerged(master.number.clone())),
        };
        if let Some(order_id) = &master.current_order_id {
            return Err(FloorError::TableOccupied(format!(
                "桌台 {} 有未结订单 {}，请先结账或转台",
                master.number, order_id
            )));
        }

        let mut released = Vec::with_capacity(members.len() + 1);
        for member_id in &members {
            // A member that vanished is skipped, the rest still unwinds
            if let Some(mut member) = ctx.find_table(member_id)? {
                member.release();
                ctx.save_table(member);
                released.push(member_id.clone());
            } else {
                tracing::warn!(master_id = %self.master_id, member_id = %member_id, "Merge member missing during unmerge");
            }
        }
        master.release();
        ctx.save_table(master);
        released.insert(0, self.master_id.clone());

        let event = ctx.emit(
            metadata,
            &self.master_id,
            EventPayload::TablesUnmerged {
                master_id: self.master_id.clone(),
                released,
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

    #[tokio::test]
    async fn test_merge_then_unmerge_all_round_trip() {
        let storage = FloorStorage::open_in_memory().unwrap();
        seed_tables(
            &storage,
            &[
                DiningTable::new("t5", "05", 2),
                DiningTable::new("t6", "06", 4),
                DiningTable::new("t11", "11", 8),
            ],
        );

        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let metadata = create_test_metadata();
        MergeTablesAction {
            master_id: "t5".to_string(),
            other_ids: vec!["t6".to_string(), "t11".to_string()],
        }
        .execute(&mut ctx, &metadata)
        .await
        .unwrap();

        let events = UnmergeAllAction {
            master_id: "t5".to_string(),
        }
        .execute(&mut ctx, &metadata)
        .await
        .unwrap();
        match &events[0].payload {
            EventPayload::TablesUnmerged { released, .. } => {
                assert_eq!(released, &["t5", "t6", "t11"]);
            }
            other => panic!("unexpected payload {other:?}"),
        }

        for (id, capacity) in [("t5", 2), ("t6", 4), ("t11", 8)] {
            let table = ctx.load_table(id).unwrap();
            assert!(table.is_primitive(), "{id}");
            assert_eq!(table.status, TableStatus::Available, "{id}");
            assert_eq!(table.capacity, capacity, "{id}");
        }
    }

    #[tokio::test]
    async fn test_unmerge_not_master_fails() {
        let storage = FloorStorage::open_in_memory().unwrap();
        seed_tables(&storage, &[DiningTable::new("t5", "05", 2)]);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let result = UnmergeAllAction {
            master_id: "t5".to_string(),
        }
        .execute(&mut ctx, &create_test_metadata())
        .await;
        assert!(matches!(result, Err(FloorError::TableNotMerged(_))));
    }

    #[tokio::test]
    async fn test_unmerge_with_open_order_fails() {
        let storage = FloorStorage::open_in_memory().unwrap();
        let mut master = occupied("t5", "05", 6, "order-1");
        master.grouping = TableGrouping::MergeMaster {
            members: vec!["t6".to_string()],
            original_capacity: 2,
        };
        seed_tables(&storage, &[master]);
        let txn = storage.begin_write().unwrap();
        let mut ctx = CommandContext::new(&txn, &storage, 0);
        let result = UnmergeAllAction {
            master_id: "t5".to_string(),
        }
        .execute(&mut ctx, &create_test_metadata())
        .await;
        assert!(matches!(result, Err(FloorError::TableOccupied(_))));
    }
}
