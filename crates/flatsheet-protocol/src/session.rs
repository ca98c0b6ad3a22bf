//! Session identity passed explicitly into the sync and presence layers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of the room a client joins
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A collaborator as announced to the room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    /// Presence highlight color (CSS color string)
    pub color: String,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Everything a session needs to know about who it is and where it sits
///
/// Handed to the session constructor explicitly rather than read from
/// ambient globals, so tests can run many sessions side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub user: UserProfile,
    pub room: RoomId,
}

impl SessionContext {
    pub fn new(user: UserProfile, room: RoomId) -> Self {
        Self { user, room }
    }
}
