//! Dashboard Page
//!
//! - GET / - Dashboard HTML page
//!
//! Every request runs a fresh fetch cycle. The gated layout answers once
//! the cycle is over; the incremental layout streams the page, flushing
//! each card as soon as its reading arrives.

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
};
use futures_util::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;

use crate::dashboard::{
    render_page, render_update, DashboardLoader, HtmlRenderer, Layout, RenderOptions, Renderer,
};
use crate::server::state::AppState;

/// GET /
pub async fn dashboard_page(State(state): State<Arc<AppState>>) -> Response {
    let options = state.config.render.clone();

    match options.layout {
        Layout::Gated => {
            let page = state.loader.load().await;
            Html(render_page(&HtmlRenderer, &page, &options)).into_response()
        }
        Layout::Incremental => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            Body::from_stream(stream_page(&state.loader, options)),
        )
            .into_response(),
    }
}

enum Stage {
    Header,
    Cards,
    Done,
}

/// HTML chunks for one incremental page: header, one fragment per
/// resolved slot, then the footer once the cycle has finished.
pub fn stream_page(
    loader: &DashboardLoader,
    options: RenderOptions,
) -> impl Stream<Item = Result<String, Infallible>> + Send + 'static {
    let (events, handle) = loader.spawn();

    stream::unfold(
        (Stage::Header, events, Some(handle), options),
        |(stage, mut events, handle, options)| async move {
            match stage {
                Stage::Header => {
                    let chunk = HtmlRenderer.header(options.layout.title());
                    Some((Ok(chunk), (Stage::Cards, events, handle, options)))
                }
                Stage::Cards => {
                    while let Some(event) = events.recv().await {
                        if let Some(chunk) = render_update(&HtmlRenderer, &event, &options) {
                            return Some((Ok(chunk), (Stage::Cards, events, handle, options)));
                        }
                    }

                    // Channel closed: the cycle is over
                    let fetched_at = match handle {
                        Some(handle) => match handle.await {
                            Ok(state) => state.fetched_at(),
                            Err(e) => {
                                tracing::error!(error = %e, "Fetch cycle task failed");
                                None
                            }
                        },
                        None => None,
                    };
                    let chunk = HtmlRenderer.footer(fetched_at);
                    Some((Ok(chunk), (Stage::Done, events, None, options)))
                }
                Stage::Done => None,
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::Indicator;
    use crate::dashboard::{FetchStrategy, ScriptedSource};
    use futures_util::StreamExt;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn collect(loader: &DashboardLoader, options: RenderOptions) -> Vec<String> {
        stream_page(loader, options)
            .map(|chunk| chunk.unwrap())
            .collect()
            .await
    }

    #[tokio::test]
    async fn test_stream_emits_one_chunk_per_card() {
        let source = Arc::new(ScriptedSource::all_ok());
        let loader = DashboardLoader::new(source, FetchStrategy::Concurrent);

        let chunks = collect(&loader, RenderOptions::default()).await;

        // header + 4 cards + footer
        assert_eq!(chunks.len(), 6);
        assert!(chunks[0].contains("Economic Data Dashboard"));
        assert!(chunks[1..5].iter().all(|c| c.contains("class=\"card\"")));
        assert!(chunks[5].contains("Fetched at "));
    }

    #[tokio::test]
    async fn test_stream_flushes_card_before_others_resolve() {
        let source = Arc::new(ScriptedSource::all_ok());
        let inflation = source.gate(Indicator::Inflation);
        let interest = source.gate(Indicator::InterestRate);
        let gdp = source.gate(Indicator::GdpGrowth);
        let loader = DashboardLoader::new(source, FetchStrategy::Concurrent);

        let mut stream = Box::pin(stream_page(&loader, RenderOptions::default()));
        let wait = Duration::from_secs(5);

        let header = stream.next().await.unwrap().unwrap();
        assert!(header.contains("Economic Data Dashboard"));

        let first = timeout(wait, stream.next()).await.unwrap().unwrap().unwrap();
        assert!(first.contains("Unemployment Rate"));

        // Three fetches are still held, nothing else may be sent yet
        assert!(timeout(Duration::from_millis(50), stream.next()).await.is_err());

        gdp.send(()).unwrap();
        let second = timeout(wait, stream.next()).await.unwrap().unwrap().unwrap();
        assert!(second.contains("GDP Growth Rate"));
        assert!(!second.contains("Inflation Rate"));

        inflation.send(()).unwrap();
        interest.send(()).unwrap();
        let rest: Vec<String> = stream.map(|chunk| chunk.unwrap()).collect().await;
        assert_eq!(rest.len(), 3);
        assert!(rest[2].contains("Fetched at "));
    }

    #[tokio::test]
    async fn test_stream_sequential_failure_stops_cards() {
        let source = Arc::new(ScriptedSource::all_ok());
        source.fail(Indicator::Inflation, "Failed to fetch inflation rate data");
        let loader = DashboardLoader::new(source.clone(), FetchStrategy::Sequential);
        let options = RenderOptions {
            surface_errors: false,
            ..Default::default()
        };

        let page = collect(&loader, options).await.concat();

        assert!(page.contains("Unemployment Rate"));
        assert!(!page.contains("Failed to load"));
        assert!(!page.contains("Interest Rate"));
        assert_eq!(
            source.calls(),
            vec![Indicator::Unemployment, Indicator::Inflation]
        );
    }
}
