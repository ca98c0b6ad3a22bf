//! Error types for the synchronization core.

use thiserror::Error;

use flatsheet_protocol::ProtocolError;
use flatsheet_store::StoreError;

use crate::transport::TransportError;

/// Error type for session and transport operations
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("grid error: {0}")]
    Grid(#[from] flatsheet_core::CoreError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("remote change dropped: {0}")]
    RemoteApply(String),
}

/// Result type for synchronization operations
pub type SyncResult<T> = Result<T, SyncError>;

impl SyncError {
    /// Create a remote-apply error from any displayable cause
    pub fn remote_apply(err: impl std::fmt::Display) -> Self {
        Self::RemoteApply(err.to_string())
    }
}
