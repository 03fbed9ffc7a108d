//! The hub-facing session engine.
//!
//! `GameEngine` is the surface the transport layer calls into: join a room,
//! forward directional input, read the grid constant. Each room that goes
//! active gets its own tick task, so rooms simulate independently; the
//! registry lock is the single critical section covering matchmaking.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::game::grid::{self, Direction};
use crate::game::state::{GameMode, TickEvent};
use crate::lobby::registry::{RegistryError, RoomHandle, RoomRegistry};
use crate::net::broadcast::BroadcastPublisher;
use crate::net::protocol::GameSnapshot;
use crate::net::push::GroupPush;

/// Errors surfaced synchronously to callers of the engine.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    /// The caller supplied a mode outside the defined set. Fatal to the
    /// call, never retried.
    #[error("unknown game mode {0}")]
    InvalidMode(u8),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub struct GameEngine {
    config: ServerConfig,
    registry: Arc<RwLock<RoomRegistry>>,
    publisher: Arc<BroadcastPublisher>,
}

impl GameEngine {
    pub fn new(config: ServerConfig, push: Arc<dyn GroupPush>) -> Self {
        let registry = Arc::new(RwLock::new(RoomRegistry::new(config.max_rooms)));
        Self {
            config,
            registry,
            publisher: Arc::new(BroadcastPublisher::new(push)),
        }
    }

    /// Join a room in the given wire-level mode and subscribe the caller's
    /// connection to that room's broadcasts. Returns the opaque room ID.
    pub fn join_game(
        &self,
        connection_id: &str,
        player_name: &str,
        mode: u8,
    ) -> Result<Uuid, EngineError> {
        let mode = GameMode::from_wire(mode).ok_or(EngineError::InvalidMode(mode))?;

        // One serialized search-and-admit step; two concurrent Duel joins
        // can never overfill a waiting room.
        let admission = self
            .registry
            .write()
            .join_room(connection_id, player_name, mode)?;

        self.publisher.add_subscriber(admission.room_id, connection_id);
        info!(
            "{} joined room {} as '{}' ({:?})",
            connection_id, admission.room_id, player_name, mode
        );

        if admission.activated {
            self.spawn_room_task(admission.room_id, admission.room);
        }
        Ok(admission.room_id)
    }

    /// Buffer a heading change for a player. Input racing against room
    /// completion is expected; an unknown room or player is a silent no-op.
    pub fn send_input(&self, room_id: Uuid, player_name: &str, direction: Direction) {
        let Some(room) = self.registry.read().room(&room_id) else {
            debug!("input for unknown room {} dropped", room_id);
            return;
        };
        room.lock().set_heading(player_name, direction);
    }

    /// Stateless grid constant, available independent of any room.
    pub fn grid_dimensions(&self) -> (i32, i32) {
        grid::dimensions()
    }

    pub fn room_count(&self) -> usize {
        self.registry.read().room_count()
    }

    /// Tear down every room; their tick tasks stop on the next tick.
    pub fn shutdown(&self) {
        self.registry.write().shutdown_all();
        info!("engine shut down, all rooms closed");
    }

    /// Drive one room at the fixed tick interval until it finishes, then
    /// evict it after the grace window.
    fn spawn_room_task(&self, room_id: Uuid, room: RoomHandle) {
        let registry = self.registry.clone();
        let publisher = self.publisher.clone();
        let tick = Duration::from_millis(self.config.tick_interval_ms);
        let grace = Duration::from_millis(self.config.finish_grace_ms);

        tokio::spawn(async move {
            let mut ticker = interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!("room {} active, ticking every {:?}", room_id, tick);

            loop {
                ticker.tick().await;

                let (snapshot, finished) = {
                    let mut room = room.lock();
                    if room.is_finished() {
                        // External shutdown raced us; nothing left to send
                        (None, true)
                    } else {
                        let events = room.tick();
                        for event in &events {
                            match event {
                                TickEvent::SnakeDied { name } => {
                                    debug!("room {}: '{}' died", room_id, name)
                                }
                                TickEvent::FoodEaten { name } => {
                                    debug!("room {}: '{}' scored", room_id, name)
                                }
                                TickEvent::RoundEnded => {}
                            }
                        }
                        (Some(GameSnapshot::from_game(room.game())), room.is_finished())
                    }
                };

                if let Some(snapshot) = snapshot {
                    publisher.publish(room_id, &snapshot);
                }

                if finished {
                    info!("room {} finished", room_id);
                    // Let the final snapshot flush before the ID disappears
                    tokio::time::sleep(grace).await;
                    registry.write().remove_room(&room_id);
                    publisher.drop_room(room_id);
                    break;
                }
            }
        });
    }
}
