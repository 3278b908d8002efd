//! Dashboard Loader
//!
//! Runs one fetch cycle for the four indicators and records each
//! result in a [`DashboardState`].
//!
//! ## Strategies
//!
//! - **Sequential**: unemployment, inflation, interest rate, GDP growth,
//!   one after another. The first failure stops the cycle and the
//!   remaining indicators are never requested.
//! - **Concurrent**: all four requests in flight at once; each result is
//!   recorded as it completes and a failure only affects its own slot.

use chrono::Utc;
use futures_util::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::state::{DashboardEvent, DashboardState, Slot};
use crate::atlas::{AtlasError, Envelope, Indicator, IndicatorSource};

/// How the four requests are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    Sequential,
    #[default]
    Concurrent,
}

impl FromStr for FetchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(FetchStrategy::Sequential),
            "concurrent" => Ok(FetchStrategy::Concurrent),
            other => Err(format!(
                "unknown fetch strategy '{}' (expected sequential or concurrent)",
                other
            )),
        }
    }
}

/// Loads one dashboard worth of readings
#[derive(Clone)]
pub struct DashboardLoader {
    source: Arc<dyn IndicatorSource>,
    strategy: FetchStrategy,
    log_payloads: bool,
}

impl DashboardLoader {
    pub fn new(source: Arc<dyn IndicatorSource>, strategy: FetchStrategy) -> Self {
        Self {
            source,
            strategy,
            log_payloads: false,
        }
    }

    /// Log every received payload at info level
    pub fn log_payloads(mut self, enabled: bool) -> Self {
        self.log_payloads = enabled;
        self
    }

    pub fn strategy(&self) -> FetchStrategy {
        self.strategy
    }

    /// Run a fetch cycle to completion
    pub async fn load(&self) -> DashboardState {
        self.run(None).await
    }

    /// Run a fetch cycle in the background.
    ///
    /// Slot transitions arrive on the receiver as they happen; the handle
    /// resolves to the final state. Dropping the receiver does not cancel
    /// the cycle, later events are simply discarded.
    pub fn spawn(&self) -> (mpsc::UnboundedReceiver<DashboardEvent>, JoinHandle<DashboardState>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = self.clone();
        let handle = tokio::spawn(async move { loader.run(Some(&tx)).await });
        (rx, handle)
    }

    /// Run a fetch cycle, optionally publishing each slot transition
    pub async fn run(&self, events: Option<&mpsc::UnboundedSender<DashboardEvent>>) -> DashboardState {
        let mut state = DashboardState::new();
        tracing::debug!(strategy = ?self.strategy, "Starting fetch cycle");

        match self.strategy {
            FetchStrategy::Sequential => {
                for indicator in Indicator::ALL {
                    let result = self.source.fetch(indicator).await;
                    let failed = result.is_err();
                    self.record(&mut state, events, indicator, result);
                    if failed {
                        break;
                    }
                }
            }
            FetchStrategy::Concurrent => {
                let source = &self.source;
                let mut in_flight: FuturesUnordered<_> = Indicator::ALL
                    .into_iter()
                    .map(|indicator| async move { (indicator, source.fetch(indicator).await) })
                    .collect();

                while let Some((indicator, result)) = in_flight.next().await {
                    self.record(&mut state, events, indicator, result);
                }
            }
        }

        state.mark_fetched(Utc::now());
        tracing::debug!(
            loaded = state.is_loaded(),
            failures = state.failures().count(),
            "Fetch cycle finished"
        );
        state
    }

    fn record(
        &self,
        state: &mut DashboardState,
        events: Option<&mpsc::UnboundedSender<DashboardEvent>>,
        indicator: Indicator,
        result: Result<Envelope, AtlasError>,
    ) {
        let slot = match result {
            Ok(envelope) => {
                if self.log_payloads {
                    tracing::info!(indicator = %indicator, payload = ?envelope.data, "Indicator data received");
                } else {
                    tracing::debug!(indicator = %indicator, payload = ?envelope.data, "Indicator data received");
                }
                Slot::Loaded(envelope.data)
            }
            Err(e) => {
                tracing::error!(indicator = %indicator, error = %e, "Error fetching economic data");
                Slot::Failed {
                    error: e.to_string(),
                }
            }
        };

        state.set(indicator, slot.clone());

        if let Some(tx) = events {
            if tx.send(DashboardEvent { indicator, slot }).is_err() {
                tracing::debug!(indicator = %indicator, "Dashboard view gone, dropping update");
            }
        }
    }
}
