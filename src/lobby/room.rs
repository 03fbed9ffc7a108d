//! A single game room: identity, lifecycle state, and player admission.

use std::time::Instant;

use uuid::Uuid;

use crate::game::simulation;
use crate::game::state::{GameMode, RoomGame, TickEvent};

/// Room lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    /// Waiting for players
    Waiting,
    /// Simulation ticking
    Active,
    /// Round over; terminal
    Finished,
}

/// One game session scoped to one Solo player or two Duel players.
///
/// Owned by the registry; once `Active`, mutated only by the room's own
/// tick task.
pub struct GameRoom {
    id: Uuid,
    pub mode: GameMode,
    pub state: RoomState,
    pub created_at: Instant,
    game: RoomGame,
}

impl GameRoom {
    pub fn new(mode: GameMode) -> Self {
        Self::from_game(mode, RoomGame::new(mode))
    }

    /// Deterministic food placement for tests.
    pub fn with_seed(mode: GameMode, seed: u64) -> Self {
        Self::from_game(mode, RoomGame::with_seed(mode, seed))
    }

    fn from_game(mode: GameMode, game: RoomGame) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            state: RoomState::Waiting,
            created_at: Instant::now(),
            game,
        }
    }

    /// Room ID: opaque, random, never reused.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn player_count(&self) -> usize {
        self.game.snakes.len()
    }

    pub fn capacity(&self) -> usize {
        self.mode.capacity()
    }

    pub fn is_full(&self) -> bool {
        self.player_count() >= self.capacity()
    }

    pub fn is_finished(&self) -> bool {
        self.state == RoomState::Finished
    }

    /// Read access to the simulation state, for snapshot building.
    pub fn game(&self) -> &RoomGame {
        &self.game
    }

    /// Admit a player. Filling the room transitions it to `Active`; the
    /// caller is told so it can start the tick task. Returns whether the
    /// room just went active.
    pub fn add_player(&mut self, connection_id: &str, player_name: &str) -> Result<bool, RoomError> {
        if self.state != RoomState::Waiting {
            return Err(RoomError::GameInProgress);
        }
        if self.is_full() {
            return Err(RoomError::RoomFull);
        }
        if self.game.snake(player_name).is_some() {
            return Err(RoomError::NameInUse);
        }

        self.game.add_snake(player_name, connection_id);

        if self.is_full() {
            self.state = RoomState::Active;
            return Ok(true);
        }
        Ok(false)
    }

    /// Buffer a heading change for a player. Stale input against a room
    /// that is not active, or for a name that does not exist, is a benign
    /// no-op.
    pub fn set_heading(&mut self, player_name: &str, direction: crate::game::grid::Direction) {
        if self.state != RoomState::Active {
            return;
        }
        if let Some(snake) = self.game.snake_mut(player_name) {
            if snake.alive {
                snake.set_pending(direction);
            }
        }
    }

    /// Run one simulation tick. Only an `Active` room ticks; the round
    /// finishing flips the room to its terminal state.
    pub fn tick(&mut self) -> Vec<TickEvent> {
        if self.state != RoomState::Active {
            return Vec::new();
        }
        let events = simulation::advance(&mut self.game);
        if self.game.finished {
            self.state = RoomState::Finished;
        }
        events
    }
}

/// Room admission errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum RoomError {
    #[error("room is full")]
    RoomFull,
    #[error("game already in progress")]
    GameInProgress,
    #[error("player name already taken in this room")]
    NameInUse,
}
