//! Atlas Dashboard Server
//!
//! Run with: cargo run --bin atlas-dashboard
//!
//! # Configuration
//!
//! Read from `config.toml` (see `atlas-cli config`) with environment
//! overrides:
//! - `ATLAS_BASE_URL`: Atlas API base address (default: http://localhost:8080/atlas)
//! - `ATLAS_LAYOUT`: gated or incremental (default: incremental)
//! - `ATLAS_FETCH_STRATEGY`: concurrent or sequential (default: concurrent)
//! - `ATLAS_HOST` / `ATLAS_PORT`: bind address (default: 0.0.0.0:8084)
//! - `RUST_LOG`: Log filter (overrides `ATLAS_LOG_LEVEL`)

use atlas_dashboard::atlas::AtlasClient;
use atlas_dashboard::config::Config;
use atlas_dashboard::dashboard::DashboardLoader;
use atlas_dashboard::logging::init_tracing;
use atlas_dashboard::server::{serve, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    init_tracing(&config.logging);

    tracing::info!("Starting Atlas dashboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Atlas API: {}", config.atlas.base_url);
    tracing::info!(
        "Layout: {:?}, fetch strategy: {:?}",
        config.dashboard.layout,
        config.dashboard.strategy
    );

    let client = Arc::new(AtlasClient::new(config.atlas_config())?);
    let loader = DashboardLoader::new(client, config.dashboard.strategy)
        .log_payloads(config.dashboard.log_payloads());

    let server_config = config.server_config();
    let state = AppState::new(loader, server_config.clone());

    serve(state, &server_config).await?;

    Ok(())
}
