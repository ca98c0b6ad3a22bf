//! Core data model and grid abstraction for flatsheet.
//!
//! This crate defines the shared vocabulary of the workspace:
//!
//! - [`Sheet`], [`Column`], [`Row`]: the tabular document under edit
//! - [`RowId`], [`ColumnId`], [`CellAddr`]: stable synthetic identifiers,
//!   independent of any rendering concern
//! - [`ChangeRecord`]: the normalized description of one accepted mutation
//! - [`GridEditor`]: the consumed contract of the grid collaborator, plus
//!   [`MemoryGrid`], the in-memory reference implementation
//! - [`export`]: on-demand JSON/CSV rendering of the current rows
//!
//! # Ownership
//!
//! The grid implementation exclusively owns the authoritative in-memory
//! sheet. Everything else in the workspace (the persisted snapshot, remote
//! peers' mirrors) holds a derived copy that is reconciled toward the grid,
//! never the reverse.

pub mod change;
pub mod error;
pub mod export;
pub mod grid;
pub mod id;
pub mod sheet;

pub use change::ChangeRecord;
pub use error::{CoreError, CoreResult};
pub use grid::{GridEditor, MemoryGrid};
pub use id::{CellAddr, ColumnId, RowId};
pub use sheet::{Column, ColumnKind, ColumnSpec, Row, Sheet};
