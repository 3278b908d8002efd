//! Economic Dashboard
//!
//! A single parameterized view over the four Atlas indicators.
//!
//! ## Architecture
//!
//! - **Loader**: runs one fetch cycle per page load, sequential or concurrent
//! - **State**: one slot per indicator (pending, loaded, failed)
//! - **Render**: gated or incremental layout, as plain text or
//!   server-rendered Leptos components
//!
//! ## Data Flow
//!
//! 1. A page load spawns a [`DashboardLoader`] cycle
//! 2. Every resolved fetch becomes a [`DashboardEvent`]
//! 3. Incremental views render each event as it arrives, gated views
//!    wait for the final [`DashboardState`]

mod html;
mod loader;
mod render;
mod state;

pub use html::{ErrorCard, HtmlRenderer, IndicatorCard, LoadingPlaceholder};
pub use loader::{DashboardLoader, FetchStrategy};
pub use render::{
    render_page, render_update, Card, Layout, RenderOptions, Renderer, TextRenderer,
};
pub use state::{DashboardEvent, DashboardSnapshot, DashboardState, Phase, Slot, SlotSnapshot};

#[cfg(test)]
pub(crate) use loader::tests::{sample, ScriptedSource};
