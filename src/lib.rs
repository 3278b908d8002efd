//! # Atlas Dashboard
//!
//! Economic indicator dashboard for the Atlas API. Fetches the current
//! unemployment rate, inflation rate, interest rate and GDP growth, and
//! renders each one as a card with its value, risk score and
//! recommendation.
//!
//! Risk scores and recommendations are computed by the Atlas backend;
//! this crate only fetches and displays them.
//!
//! ## Modules
//!
//! - [`atlas`]: HTTP client for the Atlas indicator endpoints
//! - [`dashboard`]: fetch cycle, view state and rendering
//! - [`server`]: web server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use atlas_dashboard::atlas::{AtlasClient, AtlasConfig};
//! use atlas_dashboard::dashboard::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(AtlasClient::new(AtlasConfig::default())?);
//!     let loader = DashboardLoader::new(client, FetchStrategy::Concurrent);
//!
//!     let state = loader.load().await;
//!     print!("{}", render_page(&TextRenderer, &state, &RenderOptions::default()));
//!
//!     Ok(())
//! }
//! ```

pub mod atlas;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod server;

// Re-export top-level types for convenience
pub use atlas::{
    AtlasClient, AtlasConfig, AtlasError, Envelope, Figure, Indicator, IndicatorReading,
    IndicatorSource,
};

pub use dashboard::{
    DashboardEvent, DashboardLoader, DashboardState, FetchStrategy, Layout, RenderOptions, Slot,
};

pub use server::{build_router, serve, AppState, ServerConfig, ServerError};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};
