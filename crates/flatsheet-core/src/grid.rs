//! The grid collaborator contract and its in-memory reference implementation.
//!
//! The grid exclusively owns the authoritative sheet. The synchronization
//! core never holds a second copy: it reads through the accessors and
//! writes through the mutators defined here. Every mutator returns the
//! [`ChangeRecord`] describing what it did, synchronously, which is what
//! the capture pipeline consumes.
//!
//! Local gestures go through the generating mutators ([`add_row`],
//! [`add_column`]); inbound remote changes go through the adopting
//! mutators ([`insert_row`], [`insert_column`]) so both sides end up with
//! identical identifiers.
//!
//! [`add_row`]: GridEditor::add_row
//! [`add_column`]: GridEditor::add_column
//! [`insert_row`]: GridEditor::insert_row
//! [`insert_column`]: GridEditor::insert_column

use crate::change::ChangeRecord;
use crate::error::CoreResult;
use crate::id::{CellAddr, ColumnId, RowId};
use crate::sheet::{Column, ColumnSpec, Sheet};

/// Consumed contract of the grid collaborator
pub trait GridEditor: Send {
    /// Replace the whole document (startup load, remote batch apply)
    fn import(&mut self, sheet: Sheet);

    /// Reset to an empty document (no columns, no rows)
    fn clear(&mut self);

    /// Append a blank row with a freshly generated id
    fn add_row(&mut self) -> ChangeRecord;

    /// Append a blank row with a caller-supplied id (remote apply)
    fn insert_row(&mut self, id: RowId) -> CoreResult<ChangeRecord>;

    /// Append a column with a freshly generated id
    fn add_column(&mut self, spec: ColumnSpec) -> ChangeRecord;

    /// Append an existing column definition verbatim (remote apply)
    fn insert_column(&mut self, column: Column) -> CoreResult<ChangeRecord>;

    /// Remove a row and all its cells
    fn destroy_row(&mut self, id: RowId) -> CoreResult<ChangeRecord>;

    /// Remove a column and its cell from every row
    fn destroy_column(&mut self, id: ColumnId) -> CoreResult<ChangeRecord>;

    /// Overwrite one cell's text
    fn set_cell(&mut self, addr: CellAddr, value: String) -> CoreResult<ChangeRecord>;

    /// Replace the row order with a full id sequence
    fn apply_reorder(&mut self, order: &[RowId]) -> CoreResult<ChangeRecord>;

    /// The authoritative document
    fn sheet(&self) -> &Sheet;

    /// Whether the addressed cell currently exists
    fn contains_cell(&self, addr: &CellAddr) -> bool {
        self.sheet().contains_cell(addr)
    }
}

/// In-memory grid backing a single [`Sheet`]
///
/// Used by the CLI and by tests standing in for a rendering widget.
#[derive(Debug, Default)]
pub struct MemoryGrid {
    sheet: Sheet,
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(sheet: Sheet) -> Self {
        Self { sheet }
    }
}

impl GridEditor for MemoryGrid {
    fn import(&mut self, sheet: Sheet) {
        self.sheet = sheet;
    }

    fn clear(&mut self) {
        self.sheet = Sheet::empty();
    }

    fn add_row(&mut self) -> ChangeRecord {
        let id = RowId::new();
        // Fresh ids cannot collide with an existing row.
        self.sheet
            .push_row(id)
            .unwrap_or_else(|_| unreachable!("fresh row id collided"));
        ChangeRecord::RowAdded { row: id }
    }

    fn insert_row(&mut self, id: RowId) -> CoreResult<ChangeRecord> {
        self.sheet.push_row(id)?;
        Ok(ChangeRecord::RowAdded { row: id })
    }

    fn add_column(&mut self, spec: ColumnSpec) -> ChangeRecord {
        let column = Column::new(spec.name, spec.kind);
        let record = ChangeRecord::ColumnAdded {
            column: column.clone(),
        };
        self.sheet
            .push_column(column)
            .unwrap_or_else(|_| unreachable!("fresh column id collided"));
        record
    }

    fn insert_column(&mut self, column: Column) -> CoreResult<ChangeRecord> {
        let record = ChangeRecord::ColumnAdded {
            column: column.clone(),
        };
        self.sheet.push_column(column)?;
        Ok(record)
    }

    fn destroy_row(&mut self, id: RowId) -> CoreResult<ChangeRecord> {
        self.sheet.remove_row(id)?;
        Ok(ChangeRecord::RowRemoved { row: id })
    }

    fn destroy_column(&mut self, id: ColumnId) -> CoreResult<ChangeRecord> {
        self.sheet.remove_column(id)?;
        Ok(ChangeRecord::ColumnRemoved { column: id })
    }

    fn set_cell(&mut self, addr: CellAddr, value: String) -> CoreResult<ChangeRecord> {
        let old = self.sheet.set_cell(&addr, value.clone())?;
        Ok(ChangeRecord::CellEdit {
            cell: addr,
            old,
            new: value,
        })
    }

    fn apply_reorder(&mut self, order: &[RowId]) -> CoreResult<ChangeRecord> {
        self.sheet.reorder_rows(order)?;
        Ok(ChangeRecord::RowsReordered {
            order: order.to_vec(),
        })
    }

    fn sheet(&self) -> &Sheet {
        &self.sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_add_column_then_row_produces_blank_cell() {
        let mut grid = MemoryGrid::new();
        let record = grid.add_column(ColumnSpec::text("Title"));
        let column = match record {
            ChangeRecord::ColumnAdded { column } => column,
            other => panic!("unexpected record {other:?}"),
        };
        let record = grid.add_row();
        let row = match record {
            ChangeRecord::RowAdded { row } => row,
            other => panic!("unexpected record {other:?}"),
        };
        assert_eq!(
            grid.sheet().cell(&CellAddr::new(row, column.id)),
            Some("")
        );
    }

    #[test]
    fn test_insert_row_adopts_remote_id() {
        let mut grid = MemoryGrid::new();
        grid.add_column(ColumnSpec::text("Title"));
        let remote = RowId::new();
        grid.insert_row(remote).unwrap();
        assert!(grid.sheet().row(remote).is_some());
        assert!(matches!(
            grid.insert_row(remote),
            Err(CoreError::DuplicateRow(_))
        ));
    }

    #[test]
    fn test_set_cell_reports_old_and_new() {
        let mut grid = MemoryGrid::new();
        grid.add_column(ColumnSpec::text("Title"));
        let row = match grid.add_row() {
            ChangeRecord::RowAdded { row } => row,
            other => panic!("unexpected record {other:?}"),
        };
        let column = grid.sheet().columns[0].id;
        let addr = CellAddr::new(row, column);

        grid.set_cell(addr, "Hello".into()).unwrap();
        let record = grid.set_cell(addr, "World".into()).unwrap();
        assert_eq!(
            record,
            ChangeRecord::CellEdit {
                cell: addr,
                old: "Hello".into(),
                new: "World".into(),
            }
        );
    }

    #[test]
    fn test_clear_resets_to_blank_document() {
        let mut grid = MemoryGrid::new();
        grid.add_column(ColumnSpec::text("Title"));
        grid.add_row();
        grid.clear();
        assert!(grid.sheet().is_blank());
        assert!(grid.sheet().rows.is_empty());
    }
}
