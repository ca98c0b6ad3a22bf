//! Presence: ephemeral per-cell focus marks from remote peers.
//!
//! Presence is never part of the document and never persisted. A mark
//! lives until the next signal for that cell or until its owner leaves
//! the room; a focus signal for a cell the local client has since deleted
//! is silently dropped.

use std::collections::HashMap;

use tracing::debug;

use flatsheet_core::CellAddr;
use flatsheet_protocol::UserProfile;

/// A remote peer's focus mark on one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceMark {
    /// Highlight color of the occupying peer
    pub color: String,
}

/// Tracks which cells remote peers are currently editing
#[derive(Debug, Default)]
pub struct PresenceTracker {
    marks: HashMap<CellAddr, PresenceMark>,
    roster: Vec<UserProfile>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a remote focus; `cell_exists` is whether the local document
    /// still has the cell. A focus on a vanished cell is dropped, not an
    /// error.
    pub fn remote_focus(&mut self, cell: CellAddr, color: String, cell_exists: bool) {
        if !cell_exists {
            debug!(%cell, "presence signal for a cell that no longer exists; dropped");
            return;
        }
        self.marks.insert(cell, PresenceMark { color });
    }

    /// Clear the mark for a cell a peer just left
    pub fn remote_blur(&mut self, cell: &CellAddr) {
        self.marks.remove(cell);
    }

    /// Replace the known-peers roster and prune marks whose owner left
    ///
    /// Ownership is matched by highlight color, which is all a focus
    /// signal carries on the wire.
    pub fn set_roster(&mut self, users: Vec<UserProfile>) {
        self.marks
            .retain(|_, mark| users.iter().any(|user| user.color == mark.color));
        self.roster = users;
    }

    /// Marks currently visible on the local grid
    pub fn marks(&self) -> &HashMap<CellAddr, PresenceMark> {
        &self.marks
    }

    /// The mark on one cell, if any
    pub fn mark(&self, cell: &CellAddr) -> Option<&PresenceMark> {
        self.marks.get(cell)
    }

    /// Last roster pushed by the transport
    pub fn roster(&self) -> &[UserProfile] {
        &self.roster
    }

    /// Drop every mark (local disconnect)
    pub fn clear(&mut self) {
        self.marks.clear();
        self.roster.clear();
    }
}
