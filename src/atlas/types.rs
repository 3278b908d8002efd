//! Atlas Data Types
//!
//! Indicator identifiers and the reading shape returned by every
//! Atlas endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// One of the four tracked economic indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Unemployment,
    Inflation,
    InterestRate,
    GdpGrowth,
}

impl Indicator {
    /// All indicators in display (and sequential fetch) order
    pub const ALL: [Indicator; 4] = [
        Indicator::Unemployment,
        Indicator::Inflation,
        Indicator::InterestRate,
        Indicator::GdpGrowth,
    ];

    /// Path relative to the Atlas base address
    pub fn path(self) -> &'static str {
        match self {
            Indicator::Unemployment => "/unemployment",
            Indicator::Inflation => "/inflation",
            Indicator::InterestRate => "/interest_rate",
            Indicator::GdpGrowth => "/gdp_growth",
        }
    }

    /// Stable key used in logs and JSON snapshots
    pub fn key(self) -> &'static str {
        match self {
            Indicator::Unemployment => "unemployment",
            Indicator::Inflation => "inflation",
            Indicator::InterestRate => "interest_rate",
            Indicator::GdpGrowth => "gdp_growth",
        }
    }

    /// Name shown when the server has not supplied a label yet
    pub fn display_name(self) -> &'static str {
        match self {
            Indicator::Unemployment => "Unemployment Rate",
            Indicator::Inflation => "Inflation Rate",
            Indicator::InterestRate => "Interest Rate",
            Indicator::GdpGrowth => "GDP Growth Rate",
        }
    }

    /// Position in [`Indicator::ALL`]
    pub fn index(self) -> usize {
        match self {
            Indicator::Unemployment => 0,
            Indicator::Inflation => 1,
            Indicator::InterestRate => 2,
            Indicator::GdpGrowth => 3,
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A numeric field exactly as the server sent it.
///
/// Non-numeric strings are kept verbatim so they reach the view unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Figure {
    Number(f64),
    Text(String),
}

impl Figure {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Figure::Number(n) => Some(*n),
            Figure::Text(_) => None,
        }
    }
}

impl From<f64> for Figure {
    fn from(value: f64) -> Self {
        Figure::Number(value)
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Figure::Number(n) => write!(f, "{}", n),
            Figure::Text(s) => f.write_str(s),
        }
    }
}

/// A server-supplied reading for one indicator.
///
/// Every field is optional: the server is trusted, not validated, so a
/// missing field is held as `None` and rendered as empty text instead of
/// failing the whole page. Wrongly typed fields are kept as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReading {
    #[serde(default, deserialize_with = "lenient_text")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient_figure")]
    pub value: Option<Figure>,
    #[serde(default, deserialize_with = "lenient_figure")]
    pub risk: Option<Figure>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub recommendation: Option<String>,
}

impl IndicatorReading {
    /// Create a fully populated reading
    pub fn new(
        label: impl Into<String>,
        value: f64,
        risk: f64,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            label: Some(label.into()),
            value: Some(Figure::Number(value)),
            risk: Some(Figure::Number(risk)),
            recommendation: Some(recommendation.into()),
        }
    }

    /// Build a reading from an arbitrary JSON payload.
    ///
    /// Non-object payloads yield an empty reading.
    pub fn from_payload(payload: Value) -> Self {
        if !payload.is_object() {
            tracing::warn!(payload = %payload, "Atlas payload is not an object");
            return Self::default();
        }

        serde_json::from_value(payload).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Atlas payload could not be read");
            Self::default()
        })
    }

    /// True when all four fields were supplied
    pub fn is_complete(&self) -> bool {
        self.label.is_some()
            && self.value.is_some()
            && self.risk.is_some()
            && self.recommendation.is_some()
    }
}

/// Response envelope returned by the client
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// HTTP status of the response
    pub status: u16,
    /// Decoded body
    pub data: IndicatorReading,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Booleans render as nothing in the browser view, so they count as absent.
fn lenient_figure<'de, D>(deserializer: D) -> Result<Option<Figure>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) | Some(Value::Bool(_)) => None,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) => Some(Figure::Number(v)),
            None => Some(Figure::Text(n.to_string())),
        },
        Some(Value::String(s)) => Some(Figure::Text(s)),
        Some(other) => Some(Figure::Text(other.to_string())),
    })
}
