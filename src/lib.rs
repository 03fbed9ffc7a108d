//! Snake Duel Server Library
//!
//! Real-time session engine for a multiplayer snake arcade game: room
//! matchmaking and lifecycle, per-room tick-driven simulation, and the
//! state-broadcast pipeline. Authentication, persistence, and the concrete
//! push transport live outside this crate and are consumed through the
//! capability traits in [`net::push`].

pub mod config;
pub mod engine;
pub mod game;
pub mod lobby;
pub mod net;
