//! Synchronization core for flatsheet.
//!
//! This crate decides when a local edit is persisted, when it is
//! broadcast, and how inbound remote edits are merged without feedback
//! loops:
//!
//! - [`SyncSession`]: one client's session, threading every accepted
//!   change through a single capture pipeline
//! - [`suppress`]: the re-entrancy guard that keeps applied remote
//!   changes from being rebroadcast
//! - [`reorder`]: the drag-gesture state machine coalescing a reorder
//!   into one atomic change
//! - [`presence`]: ephemeral per-cell focus marks, never persisted
//! - [`transport`]: the channel contract, an in-process room hub and the
//!   disconnected null channel
//!
//! Everything runs cooperatively on one task: handlers execute to
//! completion in event-arrival order, so the suppression flag never races
//! with itself. Persistence writes and broadcasts are issued in order but
//! may complete in either order relative to each other.

pub mod error;
pub mod presence;
pub mod reorder;
pub mod session;
pub mod suppress;
pub mod transport;

pub use error::{SyncError, SyncResult};
pub use presence::{PresenceMark, PresenceTracker};
pub use reorder::{DragPhase, ReorderCoordinator};
pub use session::SyncSession;
pub use suppress::{ApplyMode, SuppressFlag, SuppressGuard};
pub use transport::{
    MemoryHub, MemoryTransport, NullTransport, Transport, TransportError, TransportResult,
};
