//! The sheet document: ordered columns and rows of text cells.
//!
//! All mutation methods preserve the document invariant: every row holds
//! exactly one cell per column id. Adding a column back-fills a blank cell
//! into every existing row; deleting a column strips its cell from every
//! row; deleting a row takes all of its cells with it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::id::{CellAddr, ColumnId, RowId};

/// Cell value kind of a column
///
/// Only text cells exist today; the field is carried in the persisted
/// document and on the wire so typed columns can be added later without a
/// format break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    #[serde(rename = "string")]
    Text,
}

/// A column definition: stable id plus user-editable display label
///
/// Labels are not required to be unique; identity lives in the id alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            id: ColumnId::new(),
            name: name.into(),
            kind,
        }
    }
}

/// Requested shape of a new column (the `{name, type}` the UI prompts for)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Text,
        }
    }
}

/// A row: stable id plus one cell per column
///
/// Rows are ordered only by their position in [`Sheet::rows`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    #[serde(default)]
    pub cells: HashMap<ColumnId, String>,
}

impl Row {
    /// Create a blank row with one empty cell per given column
    pub fn blank(id: RowId, columns: &[Column]) -> Self {
        let cells = columns
            .iter()
            .map(|column| (column.id, String::new()))
            .collect();
        Self { id, cells }
    }
}

/// The whole tabular document under edit
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sheet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Create an empty document (no columns, no rows)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the document has no columns yet ("document genesis")
    pub fn is_blank(&self) -> bool {
        self.columns.is_empty()
    }

    /// Look up a column by id
    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Look up a column by display label (first match)
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a row by id
    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// The current row order as an id sequence
    pub fn row_order(&self) -> Vec<RowId> {
        self.rows.iter().map(|r| r.id).collect()
    }

    /// Whether the addressed cell currently exists
    pub fn contains_cell(&self, addr: &CellAddr) -> bool {
        self.row(addr.row)
            .map(|row| row.cells.contains_key(&addr.column))
            .unwrap_or(false)
    }

    /// Read a cell value
    pub fn cell(&self, addr: &CellAddr) -> Option<&str> {
        self.row(addr.row)
            .and_then(|row| row.cells.get(&addr.column))
            .map(String::as_str)
    }

    /// Append a blank row (one empty cell per existing column)
    pub fn push_row(&mut self, id: RowId) -> CoreResult<()> {
        if self.row(id).is_some() {
            return Err(CoreError::DuplicateRow(id));
        }
        self.rows.push(Row::blank(id, &self.columns));
        Ok(())
    }

    /// Append a column and back-fill a blank cell into every row
    pub fn push_column(&mut self, column: Column) -> CoreResult<()> {
        if self.column(column.id).is_some() {
            return Err(CoreError::DuplicateColumn(column.id));
        }
        for row in &mut self.rows {
            row.cells.insert(column.id, String::new());
        }
        self.columns.push(column);
        Ok(())
    }

    /// Remove a row and all of its cells
    pub fn remove_row(&mut self, id: RowId) -> CoreResult<Row> {
        let index = self
            .rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(CoreError::RowNotFound(id))?;
        Ok(self.rows.remove(index))
    }

    /// Remove a column, stripping its cell from every row
    pub fn remove_column(&mut self, id: ColumnId) -> CoreResult<Column> {
        let index = self
            .columns
            .iter()
            .position(|c| c.id == id)
            .ok_or(CoreError::ColumnNotFound(id))?;
        let column = self.columns.remove(index);
        for row in &mut self.rows {
            row.cells.remove(&id);
        }
        Ok(column)
    }

    /// Overwrite a cell value, returning the previous value
    pub fn set_cell(&mut self, addr: &CellAddr, value: String) -> CoreResult<String> {
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.id == addr.row)
            .ok_or(CoreError::RowNotFound(addr.row))?;
        let cell = row
            .cells
            .get_mut(&addr.column)
            .ok_or(CoreError::ColumnNotFound(addr.column))?;
        Ok(std::mem::replace(cell, value))
    }

    /// Replace the row order with the given full id sequence
    ///
    /// The sequence must be a permutation of the current row set; anything
    /// else is rejected without touching the document.
    pub fn reorder_rows(&mut self, order: &[RowId]) -> CoreResult<()> {
        if order.len() != self.rows.len() {
            return Err(CoreError::ReorderMismatch(format!(
                "got {} ids for {} rows",
                order.len(),
                self.rows.len()
            )));
        }
        let distinct: std::collections::HashSet<RowId> = order.iter().copied().collect();
        if distinct.len() != order.len() {
            return Err(CoreError::ReorderMismatch("duplicate row id".into()));
        }
        if let Some(id) = order.iter().find(|id| self.row(**id).is_none()) {
            return Err(CoreError::ReorderMismatch(format!("unknown row {id}")));
        }

        // Validated above: the order is a permutation of the row set.
        let mut by_id: HashMap<RowId, Row> =
            self.rows.drain(..).map(|row| (row.id, row)).collect();
        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            if let Some(row) = by_id.remove(id) {
                reordered.push(row);
            }
        }
        self.rows = reordered;
        Ok(())
    }
}
