//! Atlas REST API Client
//!
//! HTTP client for the four indicator endpoints of the Atlas API.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use super::types::{Envelope, Indicator, IndicatorReading};
use super::IndicatorSource;

/// Atlas REST API client
///
/// Each call is a live request: nothing is cached, nothing is retried.
#[derive(Clone)]
pub struct AtlasClient {
    client: Client,
    config: AtlasConfig,
}

/// Configuration for the Atlas client
#[derive(Debug, Clone)]
pub struct AtlasConfig {
    /// Base address of the Atlas API (e.g., "http://localhost:8080/atlas")
    pub base_url: String,
    /// Request timeout in milliseconds, `None` keeps the transport default
    pub request_timeout_ms: Option<u64>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/atlas".to_string(),
            request_timeout_ms: None,
        }
    }
}

impl AtlasClient {
    /// Create a new Atlas client with the given configuration
    pub fn new(config: AtlasConfig) -> Result<Self, AtlasError> {
        let mut builder = Client::builder();
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Full URL of an indicator endpoint
    pub fn endpoint(&self, indicator: Indicator) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            indicator.path()
        )
    }

    /// GET /unemployment
    pub async fn fetch_unemployment_rate(&self) -> Result<Envelope, AtlasError> {
        self.fetch(Indicator::Unemployment).await
    }

    /// GET /inflation
    pub async fn fetch_inflation_rate(&self) -> Result<Envelope, AtlasError> {
        self.fetch(Indicator::Inflation).await
    }

    /// GET /interest_rate
    pub async fn fetch_interest_rate(&self) -> Result<Envelope, AtlasError> {
        self.fetch(Indicator::InterestRate).await
    }

    /// GET /gdp_growth
    pub async fn fetch_gdp_growth(&self) -> Result<Envelope, AtlasError> {
        self.fetch(Indicator::GdpGrowth).await
    }

    /// Issue one GET request for an indicator.
    ///
    /// The body shape is not checked beyond being JSON; see
    /// [`IndicatorReading::from_payload`].
    pub async fn fetch(&self, indicator: Indicator) -> Result<Envelope, AtlasError> {
        let url = self.endpoint(indicator);
        tracing::debug!(indicator = %indicator, url = %url, "Fetching indicator");

        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AtlasError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let bytes = response.bytes().await.map_err(classify)?;
        let payload: Value = serde_json::from_slice(&bytes).map_err(|e| AtlasError::Decode {
            indicator,
            error: e.to_string(),
        })?;

        Ok(Envelope {
            status: status.as_u16(),
            data: IndicatorReading::from_payload(payload),
        })
    }
}

#[async_trait]
impl IndicatorSource for AtlasClient {
    async fn fetch(&self, indicator: Indicator) -> Result<Envelope, AtlasError> {
        AtlasClient::fetch(self, indicator).await
    }
}

fn classify(e: reqwest::Error) -> AtlasError {
    if e.is_timeout() {
        AtlasError::Timeout
    } else if e.is_connect() {
        AtlasError::Unavailable
    } else {
        AtlasError::Request(e)
    }
}

/// Pull a readable message out of an error body.
///
/// Atlas answers either with `{"error": "..."}` or with plain text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when talking to the Atlas API
#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Atlas API unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid {indicator} payload: {error}")]
    Decode { indicator: Indicator, error: String },
}
