//! Game state definitions and structures
//!
//! Contains the per-room simulation state: the snakes, the food cell, and
//! the round lifecycle flags mutated by the tick step.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::constants::snake;
use crate::game::grid::{self, Cell, Direction};

/// Game mode a room is created with. Determines room capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Single player, room starts immediately
    Solo,
    /// Two players, room waits for a second join
    Duel,
}

impl GameMode {
    /// Player capacity of a room in this mode.
    pub fn capacity(self) -> usize {
        match self {
            GameMode::Solo => 1,
            GameMode::Duel => 2,
        }
    }

    /// Decode a wire-level mode discriminant. Anything outside the defined
    /// set is rejected at the engine boundary as an invalid mode.
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(GameMode::Solo),
            1 => Some(GameMode::Duel),
            _ => None,
        }
    }
}

/// One player's snake inside a room.
#[derive(Debug, Clone)]
pub struct Snake {
    /// Display name, unique within the room and used for input addressing
    pub name: String,
    /// Opaque connection identity supplied by the transport
    pub connection_id: String,
    /// Body cells, head first. Never empty.
    pub body: VecDeque<Cell>,
    /// Direction the snake moves in on the next tick
    pub heading: Direction,
    /// Buffered input applied at the next tick boundary; last write wins
    pub pending: Option<Direction>,
    pub alive: bool,
    pub score: u32,
}

impl Snake {
    /// Create a snake with its head at `head` and the rest of the body laid
    /// out behind it, opposite to `heading`.
    pub fn new(name: String, connection_id: String, head: Cell, heading: Direction) -> Self {
        let back = heading.opposite();
        let mut body = VecDeque::with_capacity(snake::INITIAL_LENGTH);
        let mut cell = head;
        for _ in 0..snake::INITIAL_LENGTH {
            body.push_back(cell);
            cell = cell.step(back);
        }
        Self {
            name,
            connection_id,
            body,
            heading,
            pending: None,
            alive: true,
            score: 0,
        }
    }

    pub fn head(&self) -> Cell {
        // Body is never empty by construction
        *self.body.front().expect("snake body is never empty")
    }

    pub fn tail(&self) -> Cell {
        *self.body.back().expect("snake body is never empty")
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Buffer a heading change for the next tick. A direction that exactly
    /// reverses the current heading is ignored, so a snake can never turn
    /// into its own neck in a single step.
    pub fn set_pending(&mut self, direction: Direction) -> bool {
        if direction == self.heading.opposite() {
            return false;
        }
        self.pending = Some(direction);
        true
    }
}

/// Simulation state of one room.
///
/// Mutated only by the admission step (adding snakes while the room waits)
/// and by [`simulation::advance`](crate::game::simulation::advance) once the
/// room is active.
#[derive(Debug)]
pub struct RoomGame {
    pub mode: GameMode,
    /// Snakes in join order
    pub snakes: Vec<Snake>,
    /// The single active food cell
    pub food: Cell,
    /// Ticks elapsed since the room went active
    pub tick: u64,
    /// Terminal flag; a finished round never resumes
    pub finished: bool,
    rng: StdRng,
}

impl RoomGame {
    pub fn new(mode: GameMode) -> Self {
        Self::with_rng(mode, StdRng::from_entropy())
    }

    /// Deterministic variant for tests.
    pub fn with_seed(mode: GameMode, seed: u64) -> Self {
        Self::with_rng(mode, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mode: GameMode, mut rng: StdRng) -> Self {
        let food = Cell::new(rng.gen_range(0..grid::ROWS), rng.gen_range(0..grid::COLS));
        Self {
            mode,
            snakes: Vec::with_capacity(mode.capacity()),
            food,
            tick: 0,
            finished: false,
            rng,
        }
    }

    /// Spawn layout per join slot: the first snake starts near the left edge
    /// heading right, the second near the right edge heading left.
    fn spawn_slot(index: usize) -> (Cell, Direction) {
        match index {
            0 => (Cell::new(3, 2), Direction::Right),
            _ => (Cell::new(8, 9), Direction::Left),
        }
    }

    /// Add a snake for a joining player. Caller enforces capacity and name
    /// uniqueness; this only places the snake on the grid.
    pub fn add_snake(&mut self, name: &str, connection_id: &str) {
        let (head, heading) = Self::spawn_slot(self.snakes.len());
        self.snakes
            .push(Snake::new(name.to_string(), connection_id.to_string(), head, heading));
        // A spawn may land on the current food cell
        if self.snakes.iter().any(|s| s.occupies(self.food)) {
            self.relocate_food();
        }
    }

    pub fn snake(&self, name: &str) -> Option<&Snake> {
        self.snakes.iter().find(|s| s.name == name)
    }

    pub fn snake_mut(&mut self, name: &str) -> Option<&mut Snake> {
        self.snakes.iter_mut().find(|s| s.name == name)
    }

    pub fn alive_count(&self) -> usize {
        self.snakes.iter().filter(|s| s.alive).count()
    }

    /// Move the food to a uniformly random cell not occupied by any snake.
    /// If the board is completely covered the food stays where it is.
    pub fn relocate_food(&mut self) {
        let free: Vec<Cell> = (0..grid::ROWS)
            .flat_map(|row| (0..grid::COLS).map(move |col| Cell::new(row, col)))
            .filter(|cell| !self.snakes.iter().any(|s| s.occupies(*cell)))
            .collect();
        if let Some(cell) = free.get(self.rng.gen_range(0..free.len().max(1))) {
            self.food = *cell;
        }
    }
}

/// Events produced by one tick, used for lifecycle logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickEvent {
    SnakeDied { name: String },
    FoodEaten { name: String },
    RoundEnded,
}
