//! OpenWeatherMap current-conditions client.
//!
//! A missing API key is reported without touching the network. Each sub-field
//! of a successful response is read on its own: a field that is missing,
//! null, or of the wrong type takes its default without discarding the rest
//! of the reading. Only a body that is not a JSON object is rejected.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use profstat_core::error::{ProfstatError, Result};
use profstat_core::fallback::DEFAULT_ICON;
use profstat_core::Weather;

use super::WeatherProvider;

const SERVICE: &str = "Weather API";
const DEFAULT_TEMP: i32 = 20;
const DEFAULT_DESCRIPTION: &str = "Unknown";

/// Numbers, or strings holding a number.
fn as_number(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

fn non_blank(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn weather_from_value(body: &Value) -> Weather {
    // `main.temp` is the provider layout; flattened layouts put it at the top level.
    let temp = body
        .get("main")
        .and_then(|m| m.get("temp"))
        .and_then(as_number)
        .or_else(|| body.get("temp").and_then(as_number))
        .and_then(round_half_up)
        .unwrap_or(DEFAULT_TEMP);

    let first = body
        .get("weather")
        .and_then(Value::as_array)
        .and_then(|w| w.first());
    let description = non_blank(first.and_then(|c| c.get("main")))
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    let icon = non_blank(first.and_then(|c| c.get("icon")))
        .unwrap_or_else(|| DEFAULT_ICON.to_string());

    Weather { temp, description, icon }
}

/// Round half-up (`18.5 -> 19`, `-2.5 -> -2`); `None` for non-finite or out of range.
pub fn round_half_up(t: f64) -> Option<i32> {
    let r = (t + 0.5).floor();
    if r.is_finite() && r >= f64::from(i32::MIN) && r <= f64::from(i32::MAX) {
        Some(r as i32)
    } else {
        None
    }
}

/// Parse a provider response body into a `Weather`.
pub fn parse_weather_response(body: &[u8]) -> Result<Weather> {
    let parsed: Value = serde_json::from_slice(body)
        .map_err(|e| ProfstatError::Decode { service: SERVICE, reason: e.to_string() })?;
    if !parsed.is_object() {
        return Err(ProfstatError::Decode {
            service: SERVICE,
            reason: "response body is not a JSON object".into(),
        });
    }
    Ok(weather_from_value(&parsed))
}

pub struct OpenWeatherClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(endpoint: String, api_key: Option<String>, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| ProfstatError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self { client, endpoint, api_key })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    fn name(&self) -> &'static str {
        "openweathermap"
    }

    async fn current_weather(&self, location: &str) -> Result<Weather> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProfstatError::MissingCredential("No weather API key configured".into()))?;

        debug!(location, "calling weather api");
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("q", location), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| ProfstatError::Upstream { service: SERVICE, reason: e.without_url().to_string() })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProfstatError::UpstreamStatus { service: SERVICE, status: status.as_u16() });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| ProfstatError::Upstream { service: SERVICE, reason: e.without_url().to_string() })?;
        parse_weather_response(&body)
    }
}
