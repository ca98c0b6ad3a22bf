//! Stable synthetic identifiers for rows, columns and cells.
//!
//! Identity is generated at creation time and carried through change
//! records and wire messages. It is deliberately decoupled from whatever
//! the rendering layer uses for element ids.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a row, unique within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(Uuid);

impl RowId {
    /// Generate a fresh row id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stable identifier of a column, unique within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(Uuid);

impl ColumnId {
    /// Generate a fresh column id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ColumnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Address of a single cell: `(row, column)`
///
/// Cells have no identity of their own outside their row, so an address is
/// all that ever travels on the wire (presence signals, cell edits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAddr {
    pub row: RowId,
    pub column: ColumnId,
}

impl CellAddr {
    pub fn new(row: RowId, column: ColumnId) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for CellAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(RowId::new(), RowId::new());
        assert_ne!(ColumnId::new(), ColumnId::new());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = RowId::new();
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{}\"", id));
    }

    #[test]
    fn test_cell_addr_roundtrip() {
        let addr = CellAddr::new(RowId::new(), ColumnId::new());
        let json = serde_json::to_string(&addr).expect("serialize");
        let back: CellAddr = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(addr, back);
    }
}
