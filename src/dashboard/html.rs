//! HTML View
//!
//! Leptos components for the dashboard page, rendered on the server.
//! Text from the Atlas API is escaped by the view macro.

use chrono::{DateTime, Utc};
use leptos::*;

use super::render::{Card, Renderer};
use crate::atlas::Indicator;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;padding:6rem;display:flex;flex-direction:column;align-items:center}\
h1{font-size:2.25rem;margin-bottom:2rem}\
.cards{display:grid;gap:2rem;grid-template-columns:repeat(auto-fit,minmax(18rem,1fr));width:100%;max-width:64rem}\
.card{border:1px solid #ddd;border-radius:.5rem;padding:1rem;box-shadow:0 4px 12px rgba(0,0,0,.1)}\
.card h2{font-size:1.5rem;margin:0 0 .5rem}\
.card.error{border-color:#e55;color:#a22}\
footer{margin-top:2rem;color:#888;font-size:.85rem}";

/// One indicator with its value, risk and recommendation
#[component]
pub fn IndicatorCard(card: Card) -> impl IntoView {
    let Card {
        indicator,
        heading,
        value,
        risk,
        recommendation,
    } = card;

    // Streamed cards arrive in completion order, `order` keeps the grid stable
    view! {
        <div class="card" id={indicator.key()} style={format!("order:{}", indicator.index())}>
            <h2>{heading}</h2>
            <p>{value}</p>
            <p>{risk}</p>
            <p>{recommendation}</p>
        </div>
    }
}

/// Placeholder shown while the gated layout waits for readings
#[component]
pub fn LoadingPlaceholder() -> impl IntoView {
    view! {
        <div class="loading">"Loading..."</div>
    }
}

/// Card for an indicator whose fetch failed
#[component]
pub fn ErrorCard(
    indicator: Indicator,
    #[prop(into)]
    message: String,
) -> impl IntoView {
    view! {
        <div
            class="card error"
            id={indicator.key()}
            style={format!("order:{}", indicator.index())}
            role="alert"
        >
            <h2>{indicator.display_name()}</h2>
            <p>{format!("Failed to load: {}", message)}</p>
        </div>
    }
}

#[component]
fn FetchedAt(at: DateTime<Utc>) -> impl IntoView {
    view! {
        <footer>{format!("Fetched at {}", at.format("%Y-%m-%d %H:%M:%S UTC"))}</footer>
    }
}

fn render<F, N>(f: F) -> String
where
    F: FnOnce() -> N + 'static,
    N: IntoView,
{
    leptos::ssr::render_to_string(f).to_string()
}

/// HTML page renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn header(&self, title: &str) -> String {
        let document_title = title.to_string();
        let heading = title.to_string();

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n{title}\n<style>{style}</style>\n</head>\n<body>\n<main>\n{heading}\n<div class=\"cards\">\n",
            title = render(move || view! { <title>{document_title}</title> }),
            style = STYLE,
            heading = render(move || view! { <h1>{heading}</h1> }),
        )
    }

    fn loading(&self) -> String {
        render(|| view! { <LoadingPlaceholder/> }) + "\n"
    }

    fn card(&self, card: &Card) -> String {
        let card = card.clone();
        render(move || view! { <IndicatorCard card=card/> }) + "\n"
    }

    fn error(&self, indicator: Indicator, message: &str) -> String {
        let message = message.to_string();
        render(move || view! { <ErrorCard indicator=indicator message=message/> }) + "\n"
    }

    fn footer(&self, fetched_at: Option<DateTime<Utc>>) -> String {
        let mut out = String::from("</div>\n");
        if let Some(at) = fetched_at {
            out.push_str(&render(move || view! { <FetchedAt at=at/> }));
            out.push('\n');
        }
        out.push_str("</main>\n</body>\n</html>\n");
        out
    }
}
