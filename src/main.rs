use std::sync::Arc;

use tracing::{info, Level};

use snake_duel::config::ServerConfig;
use snake_duel::engine::GameEngine;
use snake_duel::net::push::ChannelPush;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Snake Duel Server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = ServerConfig::load_or_default();
    config.validate().map_err(anyhow::Error::msg)?;
    info!(
        "Configuration loaded: max_rooms={}, tick={}ms, grace={}ms",
        config.max_rooms, config.tick_interval_ms, config.finish_grace_ms
    );

    // The in-process fan-out stands in until a transport layer hooks its
    // own GroupPush implementation into the engine.
    let push = Arc::new(ChannelPush::new());
    let engine = GameEngine::new(config, push);

    info!("Engine ready, waiting for transport joins");

    // Shutdown signal handler
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    engine.shutdown();
    info!("Server stopped");

    Ok(())
}
