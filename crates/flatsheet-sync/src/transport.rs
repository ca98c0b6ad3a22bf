//! The transport channel contract and its in-memory implementations.
//!
//! A transport is a bidirectional pub/sub connection to a room of peers.
//! Delivery is at-most-once per send with FIFO ordering per sender; there
//! is no ordering guarantee across distinct senders. Messages travel as
//! encoded JSON frames; decoding happens at the consuming edge so a
//! malformed frame can be dropped without tearing the channel down.
//!
//! [`MemoryHub`] is a full in-process room used by tests and the two
//! client property checks. [`NullTransport`] is the permanently
//! disconnected channel the offline CLI runs against.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

use flatsheet_protocol::{UserProfile, WireMessage};

/// Error type for transport operations
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("not connected")]
    Disconnected,

    #[error("encode error: {0}")]
    Codec(String),
}

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Bidirectional pub/sub connection to a room of peers
#[async_trait]
pub trait Transport: Send + Sync {
    /// Publish a message to every other peer in the room
    async fn send(&self, message: WireMessage) -> TransportResult<()>;

    /// Whether the channel is currently connected
    ///
    /// Callers check this before sending; a disconnected channel simply
    /// skips broadcast and presence traffic, with no queueing or retry.
    fn is_connected(&self) -> bool;

    /// Drain inbound frames received since the last call (FIFO per sender)
    fn drain(&self) -> Vec<String>;
}

/// Blanket implementation for Arc<T>
#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, message: WireMessage) -> TransportResult<()> {
        (**self).send(message).await
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn drain(&self) -> Vec<String> {
        (**self).drain()
    }
}

/// The permanently disconnected channel (offline mode)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

#[async_trait]
impl Transport for NullTransport {
    async fn send(&self, _message: WireMessage) -> TransportResult<()> {
        Err(TransportError::Disconnected)
    }

    fn is_connected(&self) -> bool {
        false
    }

    fn drain(&self) -> Vec<String> {
        Vec::new()
    }
}

type PeerId = usize;

#[derive(Default)]
struct HubState {
    next_peer: PeerId,
    inboxes: HashMap<PeerId, Arc<Mutex<VecDeque<String>>>>,
    roster: HashMap<PeerId, UserProfile>,
}

impl HubState {
    /// Deliver a raw frame to every connected peer except the sender
    fn fan_out(&self, from: PeerId, raw: &str) {
        for (&peer, inbox) in &self.inboxes {
            if peer != from {
                inbox.lock().push_back(raw.to_string());
            }
        }
    }

    /// Push the current roster to every connected peer
    fn push_roster(&self) {
        let users: Vec<UserProfile> = self.roster.values().cloned().collect();
        let message = WireMessage::UpdateUsers { users };
        let raw = match message.encode() {
            Ok(raw) => raw,
            Err(_) => return,
        };
        for inbox in self.inboxes.values() {
            inbox.lock().push_back(raw.clone());
        }
    }
}

/// In-process room of peers
///
/// Owns the join/leave bookkeeping that drives `update-users` roster
/// pushes; the synchronization core consumes those pushes but does not
/// produce them.
#[derive(Default, Clone)]
pub struct MemoryHub {
    state: Arc<Mutex<HubState>>,
}

impl MemoryHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a new client, returning its end of the channel
    pub fn connect(&self) -> MemoryTransport {
        let mut state = self.state.lock();
        let peer = state.next_peer;
        state.next_peer += 1;
        let inbox = Arc::new(Mutex::new(VecDeque::new()));
        state.inboxes.insert(peer, Arc::clone(&inbox));
        MemoryTransport {
            peer,
            hub: Arc::clone(&self.state),
            inbox,
            connected: Arc::new(AtomicBool::new(true)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// One client's end of a [`MemoryHub`] room
#[derive(Clone)]
pub struct MemoryTransport {
    peer: PeerId,
    hub: Arc<Mutex<HubState>>,
    inbox: Arc<Mutex<VecDeque<String>>>,
    connected: Arc<AtomicBool>,
    sent: Arc<Mutex<Vec<WireMessage>>>,
}

impl MemoryTransport {
    /// Simulate losing (or regaining) the connection
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
        if !connected {
            let mut state = self.hub.lock();
            state.inboxes.remove(&self.peer);
            if state.roster.remove(&self.peer).is_some() {
                state.push_roster();
            }
        }
    }

    /// Everything this end has sent, in order (test observability)
    pub fn sent_messages(&self) -> Vec<WireMessage> {
        self.sent.lock().clone()
    }

    /// How many document-change broadcasts this end has issued
    pub fn sent_change_count(&self) -> usize {
        self.sent.lock().iter().filter(|m| m.is_change()).count()
    }

    /// Push a raw frame straight into this end's inbox (test hook for
    /// malformed input)
    pub fn inject_raw(&self, raw: impl Into<String>) {
        self.inbox.lock().push_back(raw.into());
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, message: WireMessage) -> TransportResult<()> {
        if !self.is_connected() {
            return Err(TransportError::Disconnected);
        }
        let raw = message
            .encode()
            .map_err(|e| TransportError::Codec(e.to_string()))?;

        match &message {
            // Joining and announcing are consumed by the room itself:
            // the announce updates the roster and triggers a push.
            WireMessage::Room { room } => {
                debug!(peer = self.peer, room = %room, "peer joined room");
            }
            WireMessage::User { user } => {
                let mut state = self.hub.lock();
                state.roster.insert(self.peer, user.clone());
                state.push_roster();
            }
            _ => self.hub.lock().fan_out(self.peer, &raw),
        }

        self.sent.lock().push(message);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn drain(&self) -> Vec<String> {
        self.inbox.lock().drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatsheet_core::{ChangeRecord, RowId};
    use flatsheet_protocol::RoomId;

    #[tokio::test]
    async fn test_fan_out_excludes_sender() {
        let hub = MemoryHub::new();
        let a = hub.connect();
        let b = hub.connect();
        let c = hub.connect();

        a.send(WireMessage::Change {
            change: ChangeRecord::RowAdded { row: RowId::new() },
        })
        .await
        .unwrap();

        assert!(a.drain().is_empty());
        assert_eq!(b.drain().len(), 1);
        assert_eq!(c.drain().len(), 1);
    }

    #[tokio::test]
    async fn test_frames_are_fifo_per_sender() {
        let hub = MemoryHub::new();
        let a = hub.connect();
        let b = hub.connect();

        let first = RowId::new();
        let second = RowId::new();
        a.send(WireMessage::Change {
            change: ChangeRecord::RowAdded { row: first },
        })
        .await
        .unwrap();
        a.send(WireMessage::Change {
            change: ChangeRecord::RowRemoved { row: second },
        })
        .await
        .unwrap();

        let frames = b.drain();
        let decoded: Vec<WireMessage> = frames
            .iter()
            .map(|raw| WireMessage::decode(raw).unwrap())
            .collect();
        assert_eq!(
            decoded,
            vec![
                WireMessage::Change {
                    change: ChangeRecord::RowAdded { row: first }
                },
                WireMessage::Change {
                    change: ChangeRecord::RowRemoved { row: second }
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_user_announce_pushes_roster_to_everyone() {
        let hub = MemoryHub::new();
        let a = hub.connect();
        let b = hub.connect();

        a.send(WireMessage::Room {
            room: RoomId::new("r"),
        })
        .await
        .unwrap();
        a.send(WireMessage::User {
            user: UserProfile::new("ada", "#f00"),
        })
        .await
        .unwrap();

        let roster_frames: Vec<WireMessage> = b
            .drain()
            .iter()
            .map(|raw| WireMessage::decode(raw).unwrap())
            .collect();
        assert!(roster_frames
            .iter()
            .any(|m| matches!(m, WireMessage::UpdateUsers { users } if users.len() == 1)));
    }

    #[tokio::test]
    async fn test_disconnect_stops_delivery_and_updates_roster() {
        let hub = MemoryHub::new();
        let a = hub.connect();
        let b = hub.connect();

        b.send(WireMessage::User {
            user: UserProfile::new("brin", "#0f0"),
        })
        .await
        .unwrap();
        a.drain();

        b.set_connected(false);
        assert!(!b.is_connected());
        assert!(matches!(
            b.send(WireMessage::CellBlur {
                cell: flatsheet_core::CellAddr::new(
                    RowId::new(),
                    flatsheet_core::ColumnId::new()
                ),
            })
            .await,
            Err(TransportError::Disconnected)
        ));

        // The survivor sees a roster without the departed peer.
        let frames: Vec<WireMessage> = a
            .drain()
            .iter()
            .map(|raw| WireMessage::decode(raw).unwrap())
            .collect();
        assert!(frames
            .iter()
            .any(|m| matches!(m, WireMessage::UpdateUsers { users } if users.is_empty())));
    }

    #[tokio::test]
    async fn test_null_transport_is_disconnected() {
        let transport = NullTransport;
        assert!(!transport.is_connected());
        assert!(transport.drain().is_empty());
        assert!(transport
            .send(WireMessage::Room {
                room: RoomId::new("r")
            })
            .await
            .is_err());
    }
}
