//! Subscriber-group push capability.
//!
//! The engine only needs "push this payload to all current subscribers of
//! this room id". The trait keeps the concrete transport out of the core; a
//! socket-broadcast registry or a topic-based pub/sub can implement it just
//! as well as the in-process channel fan-out provided here.

use std::collections::HashMap;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Push capability consumed by the broadcast publisher.
pub trait GroupPush: Send + Sync {
    /// Enroll a connection in a room's subscriber group.
    fn add_to_group(&self, room_id: Uuid, connection_id: &str);

    /// Deliver a payload to every current subscriber of the room.
    /// Fire-and-forget at the call site; the error is for logging only.
    fn push_to_group(&self, room_id: Uuid, payload: &[u8]) -> Result<(), PushError>;

    /// Drop a room's subscriber group entirely.
    fn remove_group(&self, room_id: Uuid);
}

/// Delivery errors on the push boundary. Logged, never retried.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PushError {
    #[error("no subscribers for room {0}")]
    NoSubscribers(Uuid),
    #[error("{failed} of {total} subscriber channels closed")]
    ChannelsClosed { failed: usize, total: usize },
}

struct Subscriber {
    connection_id: String,
    sender: mpsc::UnboundedSender<Vec<u8>>,
}

/// In-process fan-out push backed by unbounded channels, one receiver per
/// registered connection. The transport layer (or a test) holds the
/// receiving end.
#[derive(Default)]
pub struct ChannelPush {
    connections: RwLock<HashMap<String, mpsc::UnboundedSender<Vec<u8>>>>,
    groups: RwLock<HashMap<Uuid, Vec<Subscriber>>>,
}

impl ChannelPush {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and return the stream of payloads pushed to it.
    pub fn register(&self, connection_id: &str) -> mpsc::UnboundedReceiver<Vec<u8>> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.connections
            .write()
            .insert(connection_id.to_string(), sender);
        receiver
    }

    /// Forget a connection. Its group memberships die with the closed
    /// channel on the next push.
    pub fn unregister(&self, connection_id: &str) {
        self.connections.write().remove(connection_id);
    }
}

impl GroupPush for ChannelPush {
    fn add_to_group(&self, room_id: Uuid, connection_id: &str) {
        let Some(sender) = self.connections.read().get(connection_id).cloned() else {
            return;
        };
        self.groups.write().entry(room_id).or_default().push(Subscriber {
            connection_id: connection_id.to_string(),
            sender,
        });
    }

    fn push_to_group(&self, room_id: Uuid, payload: &[u8]) -> Result<(), PushError> {
        let groups = self.groups.read();
        let Some(subscribers) = groups.get(&room_id).filter(|subs| !subs.is_empty()) else {
            return Err(PushError::NoSubscribers(room_id));
        };

        let mut failed = 0;
        for subscriber in subscribers {
            if subscriber.sender.send(payload.to_vec()).is_err() {
                tracing::debug!(
                    "subscriber {} of room {} dropped its channel",
                    subscriber.connection_id,
                    room_id
                );
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(PushError::ChannelsClosed {
                failed,
                total: subscribers.len(),
            });
        }
        Ok(())
    }

    fn remove_group(&self, room_id: Uuid) {
        self.groups.write().remove(&room_id);
    }
}
