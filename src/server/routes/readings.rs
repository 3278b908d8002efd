//! Readings Routes
//!
//! - GET /api/readings - JSON snapshot of one fetch cycle

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::dashboard::DashboardSnapshot;
use crate::server::error::{ServerError, ServerResult};
use crate::server::state::AppState;

/// GET /api/readings
///
/// Partial results are returned as-is. Only a cycle that produced no
/// reading at all is reported as an upstream failure.
pub async fn get_readings(State(state): State<Arc<AppState>>) -> ServerResult<Json<DashboardSnapshot>> {
    let dashboard = state.loader.load().await;

    let any_loaded = dashboard.iter().any(|(_, slot)| slot.reading().is_some());
    if !any_loaded {
        let reasons: Vec<String> = dashboard
            .failures()
            .map(|(indicator, error)| format!("{}: {}", indicator, error))
            .collect();
        return Err(ServerError::Upstream(reasons.join("; ")));
    }

    Ok(Json(dashboard.snapshot()))
}
