//! Swarm OS engine binary.
//!
//! This is the main entry point that wires together the simulation
//! service, the broadcast hub, and the observer HTTP/`WebSocket`
//! server. It loads configuration, assembles all subsystems, and serves
//! until the process is terminated.
//!
//! The simulation starts **stopped**; issue `POST /api/simulation/start`
//! (or press Start on the dashboard) to begin ticking.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `swarm-config.yaml` (defaults if absent)
//! 3. Create the broadcast hub and snapshot sink
//! 4. Create the simulation service (world initializes here)
//! 5. Serve the observer API in the foreground

mod error;

use std::path::Path;
use std::sync::Arc;

use swarm_core::{Simulation, SwarmConfig};
use swarm_observer::{AppState, BroadcastHub, HubSink, ServerConfig, start_server};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration loading or the server fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("swarm-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        num_agents = config.world.num_agents,
        environment_size = config.world.environment_size,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        "Configuration loaded"
    );

    // 3. Broadcast hub and snapshot sink.
    let hub = Arc::new(BroadcastHub::new());
    let sink = Arc::new(HubSink::new(Arc::clone(&hub)));

    // 4. Simulation service (initializes the world).
    let sim = Arc::new(Simulation::new(&config.world, sink));
    let state = Arc::new(AppState::new(sim, hub));
    info!("Simulation service assembled (stopped; start via the API)");

    // 5. Serve the observer API in the foreground.
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    start_server(&server_config, state)
        .await
        .map_err(EngineError::from)?;

    Ok(())
}

/// Load the configuration from `swarm-config.yaml`.
///
/// Looks for the config file relative to the current working directory;
/// defaults are used when it does not exist.
fn load_config() -> Result<SwarmConfig, EngineError> {
    let config_path = Path::new("swarm-config.yaml");
    if config_path.exists() {
        let config = SwarmConfig::from_file(config_path)?;
        Ok(config)
    } else {
        info!("Config file not found, using defaults");
        Ok(SwarmConfig::default())
    }
}
