//! The statistics record served by both endpoints.
//!
//! A record is assembled once per request from two independent fetch
//! outcomes and never mutated afterwards. Both `visits` and `weather` are
//! plain values, so a record cannot exist in a partially-filled state.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Current conditions, real or synthetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Weather {
    /// Degrees Celsius, rounded to the nearest integer.
    pub temp: i32,
    pub description: String,
    pub icon: String,
}

/// Which sub-fetches succeeded and, when they did not, why.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub visit_counter_working: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_counter_error: Option<String>,
    pub weather_working: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_error: Option<String>,
}

impl Diagnostics {
    /// Build diagnostics from the two failure reasons (`None` = success).
    pub fn from_outcomes(visit_error: Option<String>, weather_error: Option<String>) -> Self {
        Self {
            visit_counter_working: visit_error.is_none(),
            visit_counter_error: visit_error,
            weather_working: weather_error.is_none(),
            weather_error,
        }
    }
}

/// Unified, always-valid result of one stats request.
#[derive(Debug, Clone, Serialize)]
pub struct StatsRecord {
    pub username: String,
    pub visits: u64,
    pub weather: Weather,
    pub location: String,
    #[serde(serialize_with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub debug: Diagnostics,
}

fn iso_millis<S: Serializer>(ts: &DateTime<Utc>, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&format_timestamp(ts))
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
