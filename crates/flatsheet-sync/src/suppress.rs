//! Echo suppression: re-entrancy guard for remote applies.
//!
//! Applying a remote change drives the same grid mutators as a local
//! edit, so without a guard the capture pipeline would rebroadcast it and
//! two clients would feed each other forever. While a remote change is in
//! flight the mode is [`ApplyMode::ApplyingRemote`] and the broadcast step
//! is a no-op.
//!
//! The mode is released through [`SuppressGuard`]'s `Drop`, so every exit
//! path of a remote apply (normal return, error, panic) restores
//! [`ApplyMode::Idle`]. A failed apply can therefore never wedge the
//! client into silence for its own future edits.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// What the session is currently doing with inbound mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Normal operation: local changes broadcast
    Idle,
    /// A remote change is being applied: broadcast is suppressed
    ApplyingRemote,
}

const IDLE: u8 = 0;
const APPLYING_REMOTE: u8 = 1;

/// Shared handle to the current apply mode
#[derive(Debug, Clone, Default)]
pub struct SuppressFlag(Arc<AtomicU8>);

impl SuppressFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current mode
    pub fn mode(&self) -> ApplyMode {
        match self.0.load(Ordering::SeqCst) {
            APPLYING_REMOTE => ApplyMode::ApplyingRemote,
            _ => ApplyMode::Idle,
        }
    }

    /// Whether broadcasts are currently suppressed
    pub fn is_suppressing(&self) -> bool {
        self.mode() == ApplyMode::ApplyingRemote
    }

    /// Enter [`ApplyMode::ApplyingRemote`] until the guard is dropped
    pub fn enter_remote(&self) -> SuppressGuard {
        self.0.store(APPLYING_REMOTE, Ordering::SeqCst);
        SuppressGuard { flag: self.clone() }
    }
}

/// Scope guard restoring [`ApplyMode::Idle`] on drop
#[must_use = "dropping the guard immediately would end suppression"]
pub struct SuppressGuard {
    flag: SuppressFlag,
}

impl Drop for SuppressGuard {
    fn drop(&mut self) {
        self.flag.0.store(IDLE, Ordering::SeqCst);
    }
}
