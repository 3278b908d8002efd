//! Dashboard Web Server
//!
//! Serves the economic dashboard over HTTP, built with Axum.
//!
//! # Endpoints
//!
//! - `GET /` - Dashboard page (gated or streamed incremental layout)
//! - `GET /api/readings` - JSON snapshot of one fetch cycle
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Status with version and uptime
//!
//! Nothing is cached: each request triggers its own fetch cycle against
//! the Atlas API.
//!
//! # Example
//!
//! ```rust,ignore
//! use atlas_dashboard::atlas::{AtlasClient, AtlasConfig};
//! use atlas_dashboard::dashboard::{DashboardLoader, FetchStrategy};
//! use atlas_dashboard::server::{serve, AppState, ServerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(AtlasClient::new(AtlasConfig::default())?);
//!     let loader = DashboardLoader::new(client, FetchStrategy::Concurrent);
//!     let config = ServerConfig::default();
//!
//!     serve(AppState::new(loader, config.clone()), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use state::{AppState, ServerConfig};

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::dashboard::dashboard_page))
        .route("/api/readings", get(routes::readings::get_readings))
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

/// Start the dashboard server
pub async fn serve(state: AppState, config: &ServerConfig) -> Result<(), ServerError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Atlas dashboard listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Atlas dashboard shut down gracefully");
    Ok(())
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Ctrl+C handler unavailable");
        std::future::pending::<()>().await;
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = interrupted() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler unavailable");
                interrupted().await;
            }
        }
    }

    #[cfg(not(unix))]
    interrupted().await;

    tracing::info!("Stopping dashboard server, draining open requests");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::Indicator;
    use crate::dashboard::{DashboardLoader, FetchStrategy, Layout, RenderOptions, ScriptedSource};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app(source: ScriptedSource, strategy: FetchStrategy, layout: Layout) -> Router {
        let loader = DashboardLoader::new(Arc::new(source), strategy);
        let config = ServerConfig {
            render: RenderOptions {
                layout,
                ..Default::default()
            },
            ..Default::default()
        };

        build_router(AppState::new(loader, config))
    }

    async fn fetch_page(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app(ScriptedSource::all_ok(), FetchStrategy::Concurrent, Layout::Gated);
        let (status, _) = fetch_page(app, "/health/live").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app(ScriptedSource::all_ok(), FetchStrategy::Sequential, Layout::Gated);
        let (status, body) = fetch_page(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["strategy"], "sequential");
    }

    #[tokio::test]
    async fn test_gated_page_example_scenario() {
        let app = create_test_app(ScriptedSource::all_ok(), FetchStrategy::Sequential, Layout::Gated);
        let (status, body) = fetch_page(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Economic Data"));
        assert!(!body.contains("Economic Data Dashboard"));
        assert!(body.contains("Unemployment Rate"));
        assert!(body.contains("Value: 4.2%"));
        assert!(body.contains("Risk: 15%"));
        assert!(body.contains("Recommendation: Stable"));
        assert!(body.contains("Value: 5.33%"));
        assert!(!body.contains("Loading..."));
    }

    #[tokio::test]
    async fn test_gated_page_shows_loaded_cards_beside_failure() {
        let source = ScriptedSource::all_ok();
        source.fail(Indicator::GdpGrowth, "Failed to fetch GDP growth data");
        let app = create_test_app(source, FetchStrategy::Concurrent, Layout::Gated);

        let (status, body) = fetch_page(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("Loading..."));
        assert!(body.contains("Unemployment Rate"));
        assert!(body.contains("Inflation Rate"));
        assert!(body.contains("Interest Rate"));
        assert_eq!(body.matches("class=\"card\"").count(), 3);
        assert!(body.contains("Failed to load: API error 500: Failed to fetch GDP growth data"));
    }

    #[tokio::test]
    async fn test_gated_page_stays_loading_when_errors_hidden() {
        let source = ScriptedSource::all_ok();
        source.fail(Indicator::GdpGrowth, "Failed to fetch GDP growth data");
        let loader = DashboardLoader::new(Arc::new(source), FetchStrategy::Concurrent);
        let config = ServerConfig {
            render: RenderOptions {
                layout: Layout::Gated,
                surface_errors: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let app = build_router(AppState::new(loader, config));

        let (status, body) = fetch_page(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Loading..."));
        assert!(!body.contains("Unemployment Rate"));
        assert!(!body.contains("Failed to load"));
    }

    #[tokio::test]
    async fn test_incremental_page_is_html() {
        let app = create_test_app(ScriptedSource::all_ok(), FetchStrategy::Concurrent, Layout::Incremental);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.contains("Economic Data Dashboard"));
        assert_eq!(body.matches("class=\"card\"").count(), 4);
        assert!(body.trim_end().ends_with("</html>"));
    }

    #[tokio::test]
    async fn test_readings_partial() {
        let source = ScriptedSource::all_ok();
        source.fail(Indicator::Inflation, "boom");
        let app = create_test_app(source, FetchStrategy::Concurrent, Layout::Gated);

        let (status, body) = fetch_page(app, "/api/readings").await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["phase"], "loading");
        assert_eq!(json["readings"][0]["status"], "loaded");
        assert_eq!(json["readings"][0]["value"], 4.2);
        assert_eq!(json["readings"][1]["status"], "failed");
    }

    #[tokio::test]
    async fn test_readings_all_failed_is_bad_gateway() {
        let source = ScriptedSource::default();
        let app = create_test_app(source, FetchStrategy::Sequential, Layout::Gated);

        let (status, body) = fetch_page(app, "/api/readings").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"]["code"], "UPSTREAM_ERROR");
    }
}
