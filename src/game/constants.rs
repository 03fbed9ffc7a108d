/// Simulation timing constants
pub mod timing {
    /// Simulation tick rate in Hz
    pub const TICK_RATE: u32 = 8;
    /// Tick duration in milliseconds
    pub const TICK_DURATION_MS: u64 = 1000 / TICK_RATE as u64;
}

/// Snake constants
pub mod snake {
    /// Body length at spawn, head included
    pub const INITIAL_LENGTH: usize = 3;
}

/// Room lifecycle constants
pub mod rooms {
    /// Maximum number of concurrently live rooms
    pub const MAX_ROOMS: usize = 1024;
    /// Grace window after a room finishes before it is evicted from the
    /// registry, so the final snapshot can flush to subscribers
    pub const FINISH_GRACE_MS: u64 = 500;
}
