//! SplitTable command handler
//!
//! Divides an AVAILABLE table into `parts` child tables. Capacity is spread
//! as evenly as possible: the first `capacity % parts` children get one extra
//! seat, so the children always sum to the parent capacity.

use async_trait::async_trait;

use crate::floor::traits::{CommandContext, CommandHandler, CommandMetadata, FloorError};
use shared::models::{DiningTable, TableGrouping, TableStatus};
use shared::order::{EventPayload, FloorEvent};

/// SplitTable action
#[derive(Debug, Clone)]
pub struct SplitTableAction {
    pub table_id: String,
    pub parts: u32,
}

/// Child id for the i-th part (0-based)
pub fn child_table_id(parent_id: &str, index: u32) -> String {
    format!("split-{}-{}", parent_id, index)
}

/// Capacities for `parts` children of a table seating `capacity`
pub fn split_capacities(capacity: u32, parts: u32) -> Vec<u32> {
    let base = capacity / parts;
    let remainder = capacity % parts;
    (0..parts)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

#[async_trait(?Send)]
impl CommandHandler for SplitTableAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<FloorEvent>, FloorError> {
        let mut parent = ctx.load_table(&self.table_id)?;

        if !parent.is_primitive() {
            return Err(FloorError::TableGrouped(format!(
                "桌台 {} 已拆分或合并，无法再拆分",
                parent.number
            )));
        }
        if parent.status != TableStatus::Available || parent.current_order_id.is_some() {
            return Err(FloorError::TableNotAvailable(format!(
                "桌台 {} 当前状态为 {:?}",
                parent.number, parent.status
            )));
        }
        if self.parts < 2 {
            return Err(FloorError::InvalidSplitParts(format!(
                "parts must be at least 2, got {}",
                self.parts
            )));
        }
        // Every child needs at least one seat
        if self.parts > parent.capacity {
            return Err(FloorError::InvalidSplitParts(format!(
                "cannot split capacity {} into {} parts",
                parent.capacity, self.parts
            )));
        }

        let capacities = split_capacities(parent.capacity, self.parts);
        let mut children = Vec::with_capacity(capacities.len());
        for (i, capacity) in capacities.iter().enumerate() {
            let id = child_table_id(&parent.id, i as u32);
            if ctx.find_table(&id)?.is_some() {
                return Err(FloorError::TableGrouped(format!(
                    "child table {} already exists",
                    id
                )));
            }
            let mut child = DiningTable::new(&id, format!("{}.{}", parent.number, i + 1), *capacity);
            child.grouping = TableGrouping::SplitChild {
                parent_id: parent.id.clone(),
            };
            children.push(child);
        }

        let child_ids: Vec<String> = children.iter().map(|c| c.id.clone()).collect();
        parent.grouping = TableGrouping::SplitParent {
            children: child_ids.clone(),
            original_capacity: parent.capacity,
        };
        parent.status = TableStatus::Occupied;
        ctx.save_table(parent);
        for child in children {
            ctx.save_table(child);
        }

        let event = ctx.emit(
            metadata,
            &self.table_id,
            EventPayload::TableSplit {
                table_id: self.table_id.clone(),
                children: child_ids,
                capacities,
            },
        );
        Ok(vec![event])
    }
}
