//! Wire types for the per-tick state broadcast.

use bincode::error::{DecodeError, EncodeError};
use serde::{Deserialize, Serialize};

use crate::game::grid::Cell;
use crate::game::state::RoomGame;

/// Per-player slice of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDto {
    pub name: String,
    /// Body cells, head first
    pub body: Vec<Cell>,
    pub alive: bool,
    pub score: u32,
}

/// Immutable per-tick projection of one room, pushed to its subscribers.
/// Players appear in join order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub players: Vec<GameDto>,
    pub food: Cell,
    pub finished: bool,
}

impl GameSnapshot {
    pub fn from_game(game: &RoomGame) -> Self {
        Self {
            players: game
                .snakes
                .iter()
                .map(|snake| GameDto {
                    name: snake.name.clone(),
                    body: snake.body.iter().copied().collect(),
                    alive: snake.alive,
                    score: snake.score,
                })
                .collect(),
            food: game.food,
            finished: game.finished,
        }
    }
}

/// Encode a payload using bincode
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, EncodeError> {
    bincode::serde::encode_to_vec(message, bincode::config::legacy())
}

/// Decode a payload using bincode
pub fn decode<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, DecodeError> {
    bincode::serde::decode_from_slice(data, bincode::config::legacy()).map(|(value, _)| value)
}
