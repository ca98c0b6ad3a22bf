//! The message envelope and its JSON codec.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use flatsheet_core::{CellAddr, ChangeRecord};

use crate::session::{RoomId, UserProfile};

/// Error type for wire encoding and decoding
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("encode error: {0}")]
    Encode(String),
}

/// Result type for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// One named event on the channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum WireMessage {
    /// Join a room of peers
    Room { room: RoomId },
    /// Announce the local user to the room
    User { user: UserProfile },
    /// Roster push, driven by the transport's own join/leave bookkeeping
    UpdateUsers { users: Vec<UserProfile> },
    /// One accepted document mutation
    Change { change: ChangeRecord },
    /// A peer focused a cell
    CellFocus { cell: CellAddr, color: String },
    /// A peer left a cell
    CellBlur { cell: CellAddr },
}

impl WireMessage {
    /// The event name as it appears on the wire
    pub fn event(&self) -> &'static str {
        match self {
            Self::Room { .. } => "room",
            Self::User { .. } => "user",
            Self::UpdateUsers { .. } => "update-users",
            Self::Change { .. } => "change",
            Self::CellFocus { .. } => "cell-focus",
            Self::CellBlur { .. } => "cell-blur",
        }
    }

    /// Whether this message mutates the document (as opposed to presence
    /// or roster traffic)
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Change { .. })
    }

    /// Encode to the JSON wire form
    pub fn encode(&self) -> ProtocolResult<String> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    /// Decode from the JSON wire form
    pub fn decode(raw: &str) -> ProtocolResult<Self> {
        serde_json::from_str(raw).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }
}
