//! Snapshot fan-out after each tick.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::net::protocol::{encode, GameSnapshot};
use crate::net::push::GroupPush;

/// Serializes per-tick snapshots and hands them to the push capability.
///
/// Delivery is at-most-once: a failure is logged and the simulation moves
/// on; there is no retry and no backlog of undelivered snapshots.
pub struct BroadcastPublisher {
    push: Arc<dyn GroupPush>,
}

impl BroadcastPublisher {
    pub fn new(push: Arc<dyn GroupPush>) -> Self {
        Self { push }
    }

    /// Enroll a joining connection in its room's subscriber group.
    pub fn add_subscriber(&self, room_id: Uuid, connection_id: &str) {
        self.push.add_to_group(room_id, connection_id);
    }

    /// Push one snapshot to the room's subscribers, fire-and-forget.
    pub fn publish(&self, room_id: Uuid, snapshot: &GameSnapshot) {
        let payload = match encode(snapshot) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("failed to encode snapshot for room {}: {}", room_id, e);
                return;
            }
        };

        if let Err(e) = self.push.push_to_group(room_id, &payload) {
            warn!("broadcast to room {} failed: {}", room_id, e);
        }
    }

    /// Tear down the room's subscriber group at eviction.
    pub fn drop_room(&self, room_id: Uuid) {
        self.push.remove_group(room_id);
    }
}
