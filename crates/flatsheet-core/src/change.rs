//! Normalized change records.
//!
//! A [`ChangeRecord`] describes exactly one accepted mutation of the
//! document. Records are ephemeral: they travel on the wire and through
//! listener paths but are never persisted. The canonical wire payload is
//! the minimal record; only a reorder carries bulk data (the full ordered
//! row-id sequence), so receivers apply a full-order replace for reorders
//! and targeted updates for everything else.

use serde::{Deserialize, Serialize};

use crate::id::{CellAddr, ColumnId, RowId};
use crate::sheet::Column;

/// One accepted mutation of the sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ChangeRecord {
    /// A single cell's text changed
    CellEdit {
        cell: CellAddr,
        old: String,
        new: String,
    },
    /// A blank row was appended
    RowAdded { row: RowId },
    /// A row and all its cells were removed
    RowRemoved { row: RowId },
    /// A column was appended (blank cell back-filled into every row)
    ColumnAdded { column: Column },
    /// A column and its cells were removed
    ColumnRemoved { column: ColumnId },
    /// The row order was replaced wholesale (one coalesced drag gesture)
    RowsReordered { order: Vec<RowId> },
}

impl ChangeRecord {
    /// Wire name of this change kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CellEdit { .. } => "cell-edit",
            Self::RowAdded { .. } => "row-added",
            Self::RowRemoved { .. } => "row-removed",
            Self::ColumnAdded { .. } => "column-added",
            Self::ColumnRemoved { .. } => "column-removed",
            Self::RowsReordered { .. } => "rows-reordered",
        }
    }

    /// Whether this record replaces the full row order rather than
    /// describing a targeted update
    pub fn is_reorder(&self) -> bool {
        matches!(self, Self::RowsReordered { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_wire_tag() {
        let record = ChangeRecord::RowAdded { row: RowId::new() };
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["kind"], record.kind());
    }

    #[test]
    fn test_reorder_carries_full_order() {
        let order = vec![RowId::new(), RowId::new(), RowId::new()];
        let record = ChangeRecord::RowsReordered {
            order: order.clone(),
        };
        assert!(record.is_reorder());

        let json = serde_json::to_string(&record).expect("serialize");
        let back: ChangeRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, ChangeRecord::RowsReordered { order });
    }

    #[test]
    fn test_cell_edit_carries_old_and_new() {
        let record = ChangeRecord::CellEdit {
            cell: CellAddr::new(RowId::new(), ColumnId::new()),
            old: "before".into(),
            new: "after".into(),
        };
        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["kind"], "cell-edit");
        assert_eq!(json["old"], "before");
        assert_eq!(json["new"], "after");
    }
}
