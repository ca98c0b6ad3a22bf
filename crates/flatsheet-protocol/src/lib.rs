//! Wire message types for the flatsheet transport channel.
//!
//! Messages are channel-scoped named events carried as JSON, tagged by
//! `event` with the body under `payload`. Event names on the wire are
//! `room`, `user`, `update-users`, `change`, `cell-focus` and
//! `cell-blur`. Connect/disconnect carry no payload and are modeled as
//! transport connection state, not as messages.
//!
//! The `change` payload is always the minimal [`ChangeRecord`]; a reorder
//! record carries the full ordered row-id sequence itself, so no separate
//! rows snapshot or sort flag travels on the wire.

pub mod message;
pub mod session;

pub use message::{ProtocolError, ProtocolResult, WireMessage};
pub use session::{RoomId, SessionContext, UserProfile};
