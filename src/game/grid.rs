//! Playfield geometry: the fixed grid, cells, and movement directions.

use serde::{Deserialize, Serialize};

/// Number of rows on the playfield.
pub const ROWS: i32 = 12;
/// Number of columns on the playfield.
pub const COLS: i32 = 12;

/// Grid dimensions as exposed to clients (rows, cols).
pub fn dimensions() -> (i32, i32) {
    (ROWS, COLS)
}

/// A single grid cell. Row 0 is the top edge, column 0 the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Whether this cell lies inside the playfield bounds.
    pub fn in_bounds(&self) -> bool {
        self.row >= 0 && self.row < ROWS && self.col >= 0 && self.col < COLS
    }

    /// The neighbouring cell one step in `direction`. May be out of bounds.
    pub fn step(&self, direction: Direction) -> Cell {
        let (dr, dc) = direction.delta();
        Cell::new(self.row + dr, self.col + dc)
    }
}

/// Cardinal movement direction for a snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Row/column offset of one step in this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// The exact reverse of this direction.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}
