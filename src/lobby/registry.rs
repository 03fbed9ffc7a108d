//! Room registry: matchmaking and room lifecycle.
//!
//! The registry is the only component that mutates the set of live rooms.
//! It is held behind a single lock by the engine, which makes the Duel
//! search-and-admit sequence one serialized critical section and preserves
//! the capacity invariant under concurrent joins.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::game::state::GameMode;
use crate::lobby::room::{GameRoom, RoomError, RoomState};

/// Handle to a room shared between the registry and the room's tick task.
pub type RoomHandle = Arc<Mutex<GameRoom>>;

/// Outcome of a successful join.
pub struct Admission {
    pub room_id: Uuid,
    pub room: RoomHandle,
    /// Whether this join filled the room and flipped it to `Active`. The
    /// caller starts the tick task exactly when this is set.
    pub activated: bool,
}

pub struct RoomRegistry {
    rooms: HashMap<Uuid, RoomHandle>,
    /// Room IDs in creation order; Duel matchmaking scans oldest first
    creation_order: Vec<Uuid>,
    max_rooms: usize,
}

impl RoomRegistry {
    pub fn new(max_rooms: usize) -> Self {
        Self {
            rooms: HashMap::new(),
            creation_order: Vec::new(),
            max_rooms,
        }
    }

    /// Join a room in the given mode.
    ///
    /// Solo always creates a fresh room, active immediately. Duel admits
    /// into the oldest waiting Duel room with a free slot, or creates a new
    /// waiting room when none exists.
    pub fn join_room(
        &mut self,
        connection_id: &str,
        player_name: &str,
        mode: GameMode,
    ) -> Result<Admission, RegistryError> {
        if mode == GameMode::Duel {
            if let Some(admission) = self.try_join_waiting(connection_id, player_name)? {
                return Ok(admission);
            }
        }
        self.create_and_join(connection_id, player_name, mode)
    }

    /// Scan waiting Duel rooms in creation order for a free slot.
    fn try_join_waiting(
        &mut self,
        connection_id: &str,
        player_name: &str,
    ) -> Result<Option<Admission>, RegistryError> {
        for room_id in &self.creation_order {
            let Some(handle) = self.rooms.get(room_id) else {
                continue;
            };
            let mut room = handle.lock();
            if room.mode != GameMode::Duel || room.state != RoomState::Waiting || room.is_full() {
                continue;
            }
            let activated = room.add_player(connection_id, player_name)?;
            return Ok(Some(Admission {
                room_id: *room_id,
                room: handle.clone(),
                activated,
            }));
        }
        Ok(None)
    }

    fn create_and_join(
        &mut self,
        connection_id: &str,
        player_name: &str,
        mode: GameMode,
    ) -> Result<Admission, RegistryError> {
        if self.rooms.len() >= self.max_rooms {
            return Err(RegistryError::TooManyRooms);
        }

        let mut room = GameRoom::new(mode);
        let activated = room.add_player(connection_id, player_name)?;
        let room_id = room.id();

        let handle = Arc::new(Mutex::new(room));
        self.rooms.insert(room_id, handle.clone());
        self.creation_order.push(room_id);

        Ok(Admission {
            room_id,
            room: handle,
            activated,
        })
    }

    pub fn room(&self, room_id: &Uuid) -> Option<RoomHandle> {
        self.rooms.get(room_id).cloned()
    }

    /// Evict a room. Idempotent; the ID is never reused, so a stale second
    /// eviction simply finds nothing.
    pub fn remove_room(&mut self, room_id: &Uuid) -> Option<RoomHandle> {
        let removed = self.rooms.remove(room_id);
        if removed.is_some() {
            self.creation_order.retain(|id| id != room_id);
        }
        removed
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Tear down every room. Marking rooms finished makes their tick tasks
    /// stop on their next tick.
    pub fn shutdown_all(&mut self) {
        for handle in self.rooms.values() {
            handle.lock().state = RoomState::Finished;
        }
        self.rooms.clear();
        self.creation_order.clear();
    }
}

/// Registry errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("too many rooms")]
    TooManyRooms,
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solo_join_creates_active_room() {
        let mut registry = RoomRegistry::new(16);

        let admission = registry
            .join_room("132", "Dabusy", GameMode::Solo)
            .unwrap();

        assert!(admission.activated);
        assert_eq!(registry.room_count(), 1);
        assert_eq!(admission.room.lock().state, RoomState::Active);
    }

    #[test]
    fn test_two_solo_joins_get_distinct_rooms() {
        let mut registry = RoomRegistry::new(16);

        let a = registry.join_room("c1", "P1", GameMode::Solo).unwrap();
        let b = registry.join_room("c2", "P2", GameMode::Solo).unwrap();

        assert_ne!(a.room_id, b.room_id);
    }

    #[test]
    fn test_duel_joins_pair_up_in_creation_order() {
        let mut registry = RoomRegistry::new(16);

        let first = registry.join_room("132", "Dabusy", GameMode::Duel).unwrap();
        assert!(!first.activated);

        let second = registry.join_room("133", "Mark", GameMode::Duel).unwrap();
        assert_eq!(first.room_id, second.room_id);
        assert!(second.activated);

        // Room is now full; a third join opens a new room
        let third = registry.join_room("134", "Lisa", GameMode::Duel).unwrap();
        assert_ne!(third.room_id, first.room_id);
        assert!(!third.activated);
    }

    #[test]
    fn test_duel_matchmaking_prefers_oldest_waiting_room() {
        let mut registry = RoomRegistry::new(16);

        let old = registry.join_room("c1", "P1", GameMode::Duel).unwrap();
        // A full solo room in between must not confuse the scan
        registry.join_room("c2", "P2", GameMode::Solo).unwrap();

        let joined = registry.join_room("c3", "P3", GameMode::Duel).unwrap();
        assert_eq!(joined.room_id, old.room_id);
    }

    #[test]
    fn test_max_rooms() {
        let mut registry = RoomRegistry::new(1);
        registry.join_room("c1", "P1", GameMode::Solo).unwrap();

        let result = registry.join_room("c2", "P2", GameMode::Solo);
        assert!(matches!(result, Err(RegistryError::TooManyRooms)));
        assert_eq!(registry.room_count(), 1);
    }

    #[test]
    fn test_duplicate_name_in_waiting_room() {
        let mut registry = RoomRegistry::new(16);
        registry.join_room("c1", "Mark", GameMode::Duel).unwrap();

        let result = registry.join_room("c2", "Mark", GameMode::Duel);
        assert!(matches!(
            result,
            Err(RegistryError::Room(RoomError::NameInUse))
        ));
    }

    #[test]
    fn test_remove_room_is_idempotent() {
        let mut registry = RoomRegistry::new(16);
        let admission = registry.join_room("c1", "P1", GameMode::Solo).unwrap();

        assert!(registry.remove_room(&admission.room_id).is_some());
        assert!(registry.remove_room(&admission.room_id).is_none());
        assert!(registry.room(&admission.room_id).is_none());
    }

    #[test]
    fn test_evicted_room_cannot_be_joined_again() {
        let mut registry = RoomRegistry::new(16);
        let first = registry.join_room("c1", "P1", GameMode::Duel).unwrap();
        registry.remove_room(&first.room_id);

        // Matchmaking must not resurrect the evicted room
        let second = registry.join_room("c2", "P2", GameMode::Duel).unwrap();
        assert_ne!(second.room_id, first.room_id);
    }

    #[test]
    fn test_shutdown_all_finishes_rooms() {
        let mut registry = RoomRegistry::new(16);
        let admission = registry.join_room("c1", "P1", GameMode::Solo).unwrap();

        registry.shutdown_all();

        assert_eq!(registry.room_count(), 0);
        assert!(admission.room.lock().is_finished());
    }
}
