//! Key-value persistence of the sheet document.
//!
//! One serialized [`Sheet`](flatsheet_core::Sheet) lives under the fixed
//! key [`DOCUMENT_KEY`]. The store is a best-effort mirror of the grid for
//! reload and offline use, never the authoritative copy: a failed write is
//! reported but the in-memory document stays usable.
//!
//! Two backends ship here: [`SqliteSheetStore`] for real use and
//! [`MemorySheetStore`] for tests (with write-failure injection).

pub mod error;
pub mod memory;
pub mod sqlite;
mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemorySheetStore;
pub use sqlite::SqliteSheetStore;
pub use store::{SheetStore, DOCUMENT_KEY};
