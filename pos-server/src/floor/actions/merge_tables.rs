//! MergeTables command handler
//!
//! The master absorbs the other tables into one billing unit. The master may
//! be a primitive table or an existing merge master (the merge is extended);
//! every absorbed table must be a primitive, AVAILABLE table without an order.
//!
//! Capacity: master = original(master) + Σ original(members). The first
//! recorded original capacity is never overwritten.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use shared::models::{TableGrouping, TableStatus};
use shared::order::{EventPayload, FloorEvent};

/// MergeTables action
#[derive(Debug, Clone)]
pub struct MergeTablesAction {
    pub master_id: String,
    pub other_ids: Vec<String>,
}

#[async_trait(?Send)]
impl CommandHandler for MergeTablesAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        let mut master = ctx.load_table(&self.master_id)?;

        // 1. Validate the id set
        if self.other_ids.is_empty() {
            return Err(FloorError::InvalidMergeSet(
                "at least one table must be merged".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for id in &self.other_ids {
            if id == &self.master_id {
                return Err(FloorError::InvalidMergeSet(format!(
                    "table {} cannot merge with itself",
                    id
                )));
            }
            if !seen.insert(id.as_str()) {
                return Err(FloorError::InvalidMergeSet(format!(
                    "table {} listed more than once",
                    id
                )));
            }
        }

        // 2. Validate the master
        let (mut members, original_capacity) = match &master.grouping {
            TableGrouping::Primitive => (Vec::new(), master.capacity),
            TableGrouping::MergeMaster {
                members,
                original_capacity,
            } => (members.clone(), *original_capacity),
            _ => {
                return Err(FloorError::TableGrouped(format!(
                    "桌台 {} 已拆分或已被合并",
                    master.number
                )));
            }
        };

        // 3. Validate every other table before touching anything
        let mut others = Vec::with_capacity(self.other_ids.len());
        for id in &self.other_ids {
            let table = ctx.load_table(id)?;
            if !table.is_primitive() {
                return Err(FloorError::TableGrouped(format!(
                    "桌台 {} 已拆分或已被合并",
                    table.number
                )));
            }
            if table.status != TableStatus::Available || table.current_order_id.is_some() {
                return Err(FloorError::TableNotAvailable(format!(
                    "桌台 {} 当前状态为 {:?}",
                    table.number, table.status
                )));
            }
            others.push(table);
        }

        // 4. Apply
        let mut capacity = master.capacity;
        for mut table in others {
            capacity += table.capacity;
            members.push(table.id.clone());
            table.grouping = TableGrouping::MergeMember {
                master_id: master.id.clone(),
                original_capacity: table.capacity,
            };
            table.status = TableStatus::Merged;
            ctx.save_table(table);
        }
        master.capacity = capacity;
        master.grouping = TableGrouping::MergeMaster {
            members: members.clone(),
            original_capacity,
        };
        ctx.save_table(master);

        let event = ctx.emit(
            metadata,
            &self.master_id,
            EventPayload::TablesMerged {
                master_id: self.master_id.clone(),
                members,
                capacity,
            },
        );
        Ok(vec![event])
    }
}
