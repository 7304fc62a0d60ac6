//! Simulation API server binary.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load engine configuration from the environment
//! 3. Construct the LLM backend and simulation service
//! 4. Serve the HTTP API until `Ctrl-C`

use std::sync::Arc;

use anyhow::Context;
use populace_engine::{EngineConfig, SimulationService, create_backend};
use populace_server::logging::init_tracing;
use populace_server::{AppState, ServerConfig, start_server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    init_tracing();
    info!("populace-server starting");

    // 2. Load configuration.
    let config = EngineConfig::from_env().context("failed to load engine configuration")?;
    let backend_config = config
        .backend
        .clone()
        .context("LLM backend configuration missing")?;
    info!(
        backend = ?backend_config.backend_type,
        model = backend_config.model,
        max_population_size = config.max_population_size,
        batch_size = config.default_batch_size,
        max_concurrent_calls = config.max_concurrent_calls,
        "Configuration loaded"
    );

    // 3. Wire the pipeline.
    let backend = Arc::new(create_backend(&backend_config));
    let service =
        SimulationService::new(backend, config).context("failed to build simulation service")?;
    let state = Arc::new(AppState::new(service));

    // 4. Serve.
    let server_config = ServerConfig::from_env()?;
    start_server(&server_config, state).await?;
    Ok(())
}
