//! Dashboard State
//!
//! One slot per indicator, written at most once per fetch cycle.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::atlas::{Indicator, IndicatorReading};

/// View state of a single indicator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Slot {
    /// Not resolved yet (or never requested)
    Pending,
    /// Reading received from the server
    Loaded(IndicatorReading),
    /// The fetch for this indicator failed
    Failed { error: String },
}

impl Slot {
    pub fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending)
    }

    pub fn reading(&self) -> Option<&IndicatorReading> {
        match self {
            Slot::Loaded(reading) => Some(reading),
            _ => None,
        }
    }
}

/// Whole-page phase used by the gated layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Loading,
    Loaded,
}

/// Transient state of one dashboard page load
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    slots: [Slot; 4],
    fetched_at: Option<DateTime<Utc>>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            slots: [Slot::Pending, Slot::Pending, Slot::Pending, Slot::Pending],
            fetched_at: None,
        }
    }

    pub fn slot(&self, indicator: Indicator) -> &Slot {
        &self.slots[indicator.index()]
    }

    pub fn set(&mut self, indicator: Indicator, slot: Slot) {
        self.slots[indicator.index()] = slot;
    }

    /// Slots in display order
    pub fn iter(&self) -> impl Iterator<Item = (Indicator, &Slot)> {
        Indicator::ALL.into_iter().zip(self.slots.iter())
    }

    /// All four readings are present
    pub fn is_loaded(&self) -> bool {
        self.slots.iter().all(|s| matches!(s, Slot::Loaded(_)))
    }

    /// No slot is waiting on a response anymore
    pub fn is_settled(&self) -> bool {
        self.slots.iter().all(|s| !s.is_pending())
    }

    pub fn failures(&self) -> impl Iterator<Item = (Indicator, &str)> {
        self.iter().filter_map(|(indicator, slot)| match slot {
            Slot::Failed { error } => Some((indicator, error.as_str())),
            _ => None,
        })
    }

    pub fn phase(&self) -> Phase {
        if self.is_loaded() {
            Phase::Loaded
        } else {
            Phase::Loading
        }
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn mark_fetched(&mut self, at: DateTime<Utc>) {
        self.fetched_at = Some(at);
    }

    /// Serializable copy for the JSON endpoint and CLI output
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            phase: self.phase(),
            fetched_at: self.fetched_at,
            readings: self
                .iter()
                .map(|(indicator, slot)| SlotSnapshot {
                    indicator,
                    slot: slot.clone(),
                })
                .collect(),
        }
    }
}

/// JSON view of a [`DashboardState`]
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub phase: Phase,
    pub fetched_at: Option<DateTime<Utc>>,
    pub readings: Vec<SlotSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotSnapshot {
    pub indicator: Indicator,
    #[serde(flatten)]
    pub slot: Slot,
}

/// A single slot transition, emitted as soon as it happens
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardEvent {
    pub indicator: Indicator,
    pub slot: Slot,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(label: &str) -> IndicatorReading {
        IndicatorReading::new(label, 1.0, 10.0, "ok")
    }

    #[test]
    fn test_new_state_is_loading() {
        let state = DashboardState::new();
        assert_eq!(state.phase(), Phase::Loading);
        assert!(!state.is_settled());
        assert!(state.iter().all(|(_, s)| s.is_pending()));
    }

    #[test]
    fn test_loaded_only_when_all_four_present() {
        let mut state = DashboardState::new();
        for indicator in &Indicator::ALL[..3] {
            state.set(*indicator, Slot::Loaded(reading(indicator.display_name())));
            assert_eq!(state.phase(), Phase::Loading);
        }

        state.set(Indicator::GdpGrowth, Slot::Loaded(reading("GDP Growth Rate")));
        assert_eq!(state.phase(), Phase::Loaded);
        assert!(state.is_settled());
    }

    #[test]
    fn test_failures_listed() {
        let mut state = DashboardState::new();
        state.set(
            Indicator::Inflation,
            Slot::Failed {
                error: "boom".to_string(),
            },
        );

        let failures: Vec<_> = state.failures().collect();
        assert_eq!(failures, vec![(Indicator::Inflation, "boom")]);
        assert_eq!(state.phase(), Phase::Loading);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut state = DashboardState::new();
        state.set(
            Indicator::Unemployment,
            Slot::Loaded(IndicatorReading::new("Unemployment Rate", 4.2, 15.0, "Stable")),
        );
        state.set(
            Indicator::Inflation,
            Slot::Failed {
                error: "API error 500".to_string(),
            },
        );

        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(json["phase"], "loading");
        assert_eq!(json["readings"][0]["indicator"], "unemployment");
        assert_eq!(json["readings"][0]["status"], "loaded");
        assert_eq!(json["readings"][0]["label"], "Unemployment Rate");
        assert_eq!(json["readings"][1]["status"], "failed");
        assert_eq!(json["readings"][1]["error"], "API error 500");
        assert_eq!(json["readings"][2]["status"], "pending");
    }
}
