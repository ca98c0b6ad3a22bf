//! Error types for the core data model.

use thiserror::Error;

use crate::id::{ColumnId, RowId};

/// Error type for sheet and grid operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("row not found: {0}")]
    RowNotFound(RowId),

    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),

    #[error("row already exists: {0}")]
    DuplicateRow(RowId),

    #[error("column already exists: {0}")]
    DuplicateColumn(ColumnId),

    #[error("reorder does not cover the current row set: {0}")]
    ReorderMismatch(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a serialization error from any displayable cause
    pub fn serialization(err: impl std::fmt::Display) -> Self {
        Self::Serialization(err.to_string())
    }
}
