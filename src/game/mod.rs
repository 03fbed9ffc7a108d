pub mod constants;
pub mod grid;
pub mod simulation;
pub mod state;
