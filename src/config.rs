use crate::game::constants::{rooms, timing};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Maximum number of concurrent game rooms
    pub max_rooms: usize,
    /// Simulation tick interval in milliseconds
    pub tick_interval_ms: u64,
    /// Delay between a room finishing and its eviction, so the final
    /// snapshot can flush
    pub finish_grace_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_rooms: rooms::MAX_ROOMS,
            tick_interval_ms: timing::TICK_DURATION_MS,
            finish_grace_ms: rooms::FINISH_GRACE_MS,
        }
    }
}

impl ServerConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(max_rooms) = std::env::var("MAX_ROOMS") {
            if let Ok(parsed) = max_rooms.parse::<usize>() {
                if parsed > 0 && parsed <= 100_000 {
                    config.max_rooms = parsed;
                } else {
                    tracing::warn!("MAX_ROOMS must be 1-100000, using default");
                }
            } else {
                tracing::warn!("Invalid MAX_ROOMS '{}', using default", max_rooms);
            }
        }

        if let Ok(tick_ms) = std::env::var("TICK_MS") {
            if let Ok(parsed) = tick_ms.parse::<u64>() {
                if parsed > 0 {
                    config.tick_interval_ms = parsed;
                } else {
                    tracing::warn!("TICK_MS must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid TICK_MS '{}', using default", tick_ms);
            }
        }

        if let Ok(grace_ms) = std::env::var("FINISH_GRACE_MS") {
            if let Ok(parsed) = grace_ms.parse::<u64>() {
                config.finish_grace_ms = parsed;
            } else {
                tracing::warn!("Invalid FINISH_GRACE_MS '{}', using default", grace_ms);
            }
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        if self.max_rooms == 0 {
            return Err("max_rooms must be at least 1".to_string());
        }
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.max_rooms, 1024);
        assert_eq!(config.tick_interval_ms, 125);
        assert_eq!(config.finish_grace_ms, 500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_tick() {
        let config = ServerConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
