//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Occupancy status of a table (桌台状态)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    /// Absorbed into a merge master; never set directly
    Merged,
}

/// Structural role of a table
///
/// A table holds exactly one role at a time, so "split and merged at once"
/// cannot be represented. `original_capacity` is the capacity to restore
/// when the table returns to [`TableGrouping::Primitive`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableGrouping {
    #[default]
    Primitive,
    SplitParent {
        children: Vec<String>,
        original_capacity: u32,
    },
    SplitChild {
        parent_id: String,
    },
    MergeMaster {
        members: Vec<String>,
        original_capacity: u32,
    },
    MergeMember {
        master_id: String,
        original_capacity: u32,
    },
}

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub id: String,
    /// Display number, dotted for split children ("12.1")
    pub number: String,
    pub capacity: u32,
    pub status: TableStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_order_id: Option<String>,
    #[serde(default)]
    pub grouping: TableGrouping,
    #[serde(default)]
    pub updated_at: i64,
}

impl DiningTable {
    pub fn new(id: impl Into<String>, number: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            number: number.into(),
            capacity,
            status: TableStatus::Available,
            current_order_id: None,
            grouping: TableGrouping::Primitive,
            updated_at: 0,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.grouping, TableGrouping::Primitive)
    }

    pub fn is_split(&self) -> bool {
        matches!(self.grouping, TableGrouping::SplitParent { .. })
    }

    pub fn parent_id(&self) -> Option<&str> {
        match &self.grouping {
            TableGrouping::SplitChild { parent_id } => Some(parent_id),
            _ => None,
        }
    }

    /// Ids absorbed by this table when it is a merge master
    pub fn merged_with(&self) -> &[String] {
        match &self.grouping {
            TableGrouping::MergeMaster { members, .. } => members,
            _ => &[],
        }
    }

    pub fn master_table_id(&self) -> Option<&str> {
        match &self.grouping {
            TableGrouping::MergeMember { master_id, .. } => Some(master_id),
            _ => None,
        }
    }

    pub fn original_capacity(&self) -> Option<u32> {
        match &self.grouping {
            TableGrouping::SplitParent {
                original_capacity, ..
            }
            | TableGrouping::MergeMaster {
                original_capacity, ..
            }
            | TableGrouping::MergeMember {
                original_capacity, ..
            } => Some(*original_capacity),
            _ => None,
        }
    }

    /// Orderable unit: a primitive table, a merge master or a split child
    pub fn is_orderable(&self) -> bool {
        self.status != TableStatus::Merged
            && !matches!(
                self.grouping,
                TableGrouping::SplitParent { .. } | TableGrouping::MergeMember { .. }
            )
    }

    /// Return to a primitive AVAILABLE table with its original capacity restored
    pub fn release(&mut self) {
        if let Some(original) = self.original_capacity() {
            self.capacity = original;
        }
        self.grouping = TableGrouping::Primitive;
        self.status = TableStatus::Available;
        self.current_order_id = None;
    }
}

/// Flattened wire view of a table
///
/// Exposes the structural role as the flat fields floor-plan clients read
/// (`is_split`, `parent_id`, `merged_with`, `master_table_id`,
/// `original_capacity`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableView {
    pub id: String,
    pub number: String,
    pub capacity: u32,
    pub status: TableStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_order_id: Option<String>,
    pub is_split: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub merged_with: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_table_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_capacity: Option<u32>,
    pub is_orderable: bool,
}

impl From<&DiningTable> for TableView {
    fn from(table: &DiningTable) -> Self {
        Self {
            id: table.id.clone(),
            number: table.number.clone(),
            capacity: table.capacity,
            status: table.status,
            current_order_id: table.current_order_id.clone(),
            is_split: table.is_split(),
            parent_id: table.parent_id().map(str::to_string),
            merged_with: table.merged_with().to_vec(),
            master_table_id: table.master_table_id().map(str::to_string),
            original_capacity: table.original_capacity(),
            is_orderable: table.is_orderable(),
        }
    }
}
