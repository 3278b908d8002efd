//! Atlas API Integration
//!
//! Consumes the Atlas backend, which scores four economic indicators
//! and attaches a recommendation to each one.
//!
//! ## Endpoints
//!
//! - `GET /unemployment`
//! - `GET /inflation`
//! - `GET /interest_rate`
//! - `GET /gdp_growth`
//!
//! All four answer with `{ label, value, risk, recommendation }`.

mod client;
mod types;

pub use client::{AtlasClient, AtlasConfig, AtlasError};
pub use types::{Envelope, Figure, Indicator, IndicatorReading};

use async_trait::async_trait;

/// Anything that can produce indicator readings
///
/// Implemented by [`AtlasClient`]; the dashboard loader only depends on
/// this trait.
#[async_trait]
pub trait IndicatorSource: Send + Sync {
    /// Fetch the current reading for one indicator
    async fn fetch(&self, indicator: Indicator) -> Result<Envelope, AtlasError>;
}
