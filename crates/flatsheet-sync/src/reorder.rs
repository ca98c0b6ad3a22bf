//! Reorder coalescing: the drag gesture as an explicit state machine.
//!
//! A drag gesture fires many intermediate move events; broadcasting each
//! would flood the channel and remote views would thrash through
//! half-reordered states. The coordinator swallows everything between
//! `dragstart` and `drop` and lets the session emit exactly one
//! full-order change at commit time, so receivers only ever see complete,
//! consistent orderings.

use tracing::{debug, warn};

/// Phase of the current drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    /// No gesture in progress
    #[default]
    Idle,
    /// Between dragstart and drop: all events swallowed
    Sorting,
    /// Drop received: the single coalesced change is being emitted
    Committing,
}

/// Tracks one drag gesture at a time (the grid contract guarantees no
/// nesting)
#[derive(Debug, Default)]
pub struct ReorderCoordinator {
    phase: DragPhase,
}

impl ReorderCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Whether broadcasts and writes are currently being swallowed
    pub fn in_gesture(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    /// Idle → Sorting on dragstart
    pub fn begin(&mut self) {
        if self.phase != DragPhase::Idle {
            warn!(phase = ?self.phase, "dragstart while a gesture is already active");
            return;
        }
        self.phase = DragPhase::Sorting;
    }

    /// Intermediate move/hover events are ignored; returns whether the
    /// event was swallowed
    pub fn hover(&mut self) -> bool {
        match self.phase {
            DragPhase::Sorting => {
                debug!("drag hover swallowed");
                true
            }
            _ => false,
        }
    }

    /// Sorting → Committing on drop; `false` means there was no gesture
    /// to commit (a stray drop)
    pub fn commit(&mut self) -> bool {
        if self.phase != DragPhase::Sorting {
            warn!(phase = ?self.phase, "drop without a matching dragstart");
            return false;
        }
        self.phase = DragPhase::Committing;
        true
    }

    /// Committing → Idle once the coalesced change has been emitted
    pub fn finish(&mut self) {
        self.phase = DragPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_gesture_cycle() {
        let mut coordinator = ReorderCoordinator::new();
        assert_eq!(coordinator.phase(), DragPhase::Idle);

        coordinator.begin();
        assert_eq!(coordinator.phase(), DragPhase::Sorting);
        assert!(coordinator.in_gesture());

        for _ in 0..10 {
            assert!(coordinator.hover());
        }
        assert_eq!(coordinator.phase(), DragPhase::Sorting);

        assert!(coordinator.commit());
        assert_eq!(coordinator.phase(), DragPhase::Committing);

        coordinator.finish();
        assert_eq!(coordinator.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_stray_drop_is_rejected() {
        let mut coordinator = ReorderCoordinator::new();
        assert!(!coordinator.commit());
        assert_eq!(coordinator.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_hover_outside_gesture_is_not_swallowed() {
        let mut coordinator = ReorderCoordinator::new();
        assert!(!coordinator.hover());
    }

    #[test]
    fn test_double_dragstart_keeps_first_gesture() {
        let mut coordinator = ReorderCoordinator::new();
        coordinator.begin();
        coordinator.begin();
        assert_eq!(coordinator.phase(), DragPhase::Sorting);
        assert!(coordinator.commit());
    }
}
