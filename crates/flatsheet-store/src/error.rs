//! Error types for document persistence.

use thiserror::Error;

/// Error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("write rejected: {0}")]
    WriteRejected(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a write-rejected error
    pub fn write_rejected(msg: impl Into<String>) -> Self {
        Self::WriteRejected(msg.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
