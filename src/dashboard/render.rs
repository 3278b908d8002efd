//! Dashboard Rendering
//!
//! Turns a [`DashboardState`] into text. The same card/placeholder logic
//! drives both the HTML page ([`super::html`]) and the terminal view
//! through [`Renderer`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::state::{DashboardEvent, DashboardState, Slot};
use crate::atlas::{Figure, Indicator, IndicatorReading};

/// Page layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One loading placeholder until all four readings are in
    Gated,
    /// Every card shows up as soon as its own reading arrives
    #[default]
    Incremental,
}

impl Layout {
    pub fn title(self) -> &'static str {
        match self {
            Layout::Gated => "Economic Data",
            Layout::Incremental => "Economic Data Dashboard",
        }
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gated" => Ok(Layout::Gated),
            "incremental" => Ok(Layout::Incremental),
            other => Err(format!(
                "unknown layout '{}' (expected gated or incremental)",
                other
            )),
        }
    }
}

/// Rendering switches
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub layout: Layout,
    /// Suffix the unemployment value with "%" like the other three
    pub unemployment_as_percent: bool,
    /// Show failed indicators instead of only logging them
    pub surface_errors: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            unemployment_as_percent: true,
            surface_errors: true,
        }
    }
}

/// Display strings for one indicator card
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub indicator: Indicator,
    pub heading: String,
    pub value: String,
    pub risk: String,
    pub recommendation: String,
}

impl Card {
    /// Missing fields render as empty text, suffixes are kept.
    pub fn new(indicator: Indicator, reading: &IndicatorReading, options: &RenderOptions) -> Self {
        let value_suffix = if indicator != Indicator::Unemployment || options.unemployment_as_percent {
            "%"
        } else {
            ""
        };

        Self {
            indicator,
            heading: reading.label.clone().unwrap_or_default(),
            value: format!("Value: {}{}", format_figure(reading.value.as_ref()), value_suffix),
            risk: format!("Risk: {}%", format_figure(reading.risk.as_ref())),
            recommendation: format!(
                "Recommendation: {}",
                reading.recommendation.as_deref().unwrap_or_default()
            ),
        }
    }
}

fn format_figure(figure: Option<&Figure>) -> String {
    figure.map(ToString::to_string).unwrap_or_default()
}

/// Output target for dashboard pages
pub trait Renderer {
    fn header(&self, title: &str) -> String;
    fn loading(&self) -> String;
    fn card(&self, card: &Card) -> String;
    fn error(&self, indicator: Indicator, message: &str) -> String;
    fn footer(&self, fetched_at: Option<DateTime<Utc>>) -> String;
}

/// Render a full page from the current state
pub fn render_page<R: Renderer + ?Sized>(
    renderer: &R,
    state: &DashboardState,
    options: &RenderOptions,
) -> String {
    let mut out = renderer.header(options.layout.title());

    match options.layout {
        Layout::Gated => {
            // With errors surfaced, a settled cycle shows what it got
            if state.is_loaded() || (options.surface_errors && state.is_settled()) {
                for (indicator, slot) in state.iter() {
                    if let Some(fragment) = render_slot(renderer, indicator, slot, options) {
                        out.push_str(&fragment);
                    }
                }
            } else {
                out.push_str(&renderer.loading());
                if options.surface_errors {
                    for (indicator, error) in state.failures() {
                        out.push_str(&renderer.error(indicator, error));
                    }
                }
            }
        }
        Layout::Incremental => {
            for (indicator, slot) in state.iter() {
                if let Some(fragment) = render_slot(renderer, indicator, slot, options) {
                    out.push_str(&fragment);
                }
            }
        }
    }

    out.push_str(&renderer.footer(state.fetched_at()));
    out
}

/// Fragment for a single slot transition, used by incremental views.
///
/// Returns `None` when the transition has nothing to show.
pub fn render_update<R: Renderer + ?Sized>(
    renderer: &R,
    event: &DashboardEvent,
    options: &RenderOptions,
) -> Option<String> {
    render_slot(renderer, event.indicator, &event.slot, options)
}

fn render_slot<R: Renderer + ?Sized>(
    renderer: &R,
    indicator: Indicator,
    slot: &Slot,
    options: &RenderOptions,
) -> Option<String> {
    match slot {
        Slot::Pending => None,
        Slot::Loaded(reading) => Some(renderer.card(&Card::new(indicator, reading, options))),
        Slot::Failed { error } if options.surface_errors => Some(renderer.error(indicator, error)),
        Slot::Failed { .. } => None,
    }
}

// ============================================
// Terminal
// ============================================

/// Plain text renderer for the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn header(&self, title: &str) -> String {
        format!("{}\n{}\n\n", title, "=".repeat(title.chars().count()))
    }

    fn loading(&self) -> String {
        "Loading...\n\n".to_string()
    }

    fn card(&self, card: &Card) -> String {
        format!(
            "{}\n  {}\n  {}\n  {}\n\n",
            card.heading, card.value, card.risk, card.recommendation
        )
    }

    fn error(&self, indicator: Indicator, message: &str) -> String {
        format!("{}\n  Failed to load: {}\n\n", indicator.display_name(), message)
    }

    fn footer(&self, fetched_at: Option<DateTime<Utc>>) -> String {
        fetched_at
            .map(|at| format!("Fetched at {}\n", at.format("%Y-%m-%d %H:%M:%S UTC")))
            .unwrap_or_default()
    }
}
