use std::net::SocketAddr;

use chrono::NaiveDate;
use serde::Deserialize;

use profstat_core::error::{ProfstatError, Result};
use profstat_core::fallback::FallbackPolicy;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    pub profile: ProfileSection,

    #[serde(default)]
    pub counter: CounterSection,

    #[serde(default)]
    pub weather: WeatherSection,

    #[serde(default)]
    pub fallback: FallbackSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ProfstatError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.gateway.validate()?;
        self.profile.validate()?;
        self.counter.validate()?;
        self.weather.validate()?;
        self.fallback.to_policy().validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .map_err(|e| ProfstatError::Config(format!("gateway.listen must be a socket address: {e}")))
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSection {
    pub username: String,
    pub location: String,
    /// Query sent to the weather provider; defaults to `location`.
    #[serde(default)]
    pub location_query: Option<String>,
}

impl ProfileSection {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(ProfstatError::Config("profile.username must not be empty".into()));
        }
        if self.location.trim().is_empty() {
            return Err(ProfstatError::Config("profile.location must not be empty".into()));
        }
        Ok(())
    }

    pub fn location_query(&self) -> &str {
        self.location_query.as_deref().unwrap_or(&self.location)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterBackend {
    /// Redis-over-REST store (Upstash / Vercel KV).
    Rest,
    /// In-process counter; resets on restart.
    Memory,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterSection {
    #[serde(default = "default_counter_backend")]
    pub backend: CounterBackend,

    /// Store key; defaults to `profile-views-<username>`.
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default = "default_counter_url_env")]
    pub url_env: String,

    #[serde(default = "default_counter_token_env")]
    pub token_env: String,

    #[serde(default = "default_counter_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for CounterSection {
    fn default() -> Self {
        Self {
            backend: default_counter_backend(),
            key: None,
            url_env: default_counter_url_env(),
            token_env: default_counter_token_env(),
            timeout_ms: default_counter_timeout_ms(),
        }
    }
}

impl CounterSection {
    pub fn validate(&self) -> Result<()> {
        validate_timeout("counter.timeout_ms", self.timeout_ms)?;
        if matches!(&self.key, Some(k) if k.trim().is_empty()) {
            return Err(ProfstatError::Config("counter.key must not be empty".into()));
        }
        Ok(())
    }

    pub fn key_for(&self, username: &str) -> String {
        self.key
            .clone()
            .unwrap_or_else(|| format!("profile-views-{username}"))
    }
}

fn default_counter_backend() -> CounterBackend {
    CounterBackend::Rest
}
fn default_counter_url_env() -> String {
    "KV_REST_API_URL".into()
}
fn default_counter_token_env() -> String {
    "KV_REST_API_TOKEN".into()
}
fn default_counter_timeout_ms() -> u64 {
    3000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherSection {
    #[serde(default = "default_weather_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_weather_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_weather_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for WeatherSection {
    fn default() -> Self {
        Self {
            endpoint: default_weather_endpoint(),
            api_key_env: default_weather_api_key_env(),
            timeout_ms: default_weather_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl WeatherSection {
    pub fn validate(&self) -> Result<()> {
        validate_timeout("weather.timeout_ms", self.timeout_ms)?;
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ProfstatError::Config(
                "weather.endpoint must be an http(s) URL".into(),
            ));
        }
        Ok(())
    }
}

fn default_weather_endpoint() -> String {
    "https://api.openweathermap.org/data/2.5/weather".into()
}
fn default_weather_api_key_env() -> String {
    "WEATHER_API_KEY".into()
}
fn default_weather_timeout_ms() -> u64 {
    8000
}
fn default_user_agent() -> String {
    "GitHub-Profile-Counter/1.0".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FallbackSection {
    #[serde(default = "default_base_count")]
    pub base_count: u64,

    #[serde(default = "default_pivot_date")]
    pub pivot_date: NaiveDate,

    #[serde(default = "default_daily_growth")]
    pub daily_growth: f64,

    #[serde(default = "default_jitter_max")]
    pub jitter_max: u32,
}

impl Default for FallbackSection {
    fn default() -> Self {
        Self {
            base_count: default_base_count(),
            pivot_date: default_pivot_date(),
            daily_growth: default_daily_growth(),
            jitter_max: default_jitter_max(),
        }
    }
}

impl FallbackSection {
    pub fn to_policy(&self) -> FallbackPolicy {
        FallbackPolicy {
            base_count: self.base_count,
            pivot_date: self.pivot_date,
            daily_growth: self.daily_growth,
            jitter_max: self.jitter_max,
        }
    }
}

fn default_base_count() -> u64 {
    FallbackPolicy::default().base_count
}
fn default_pivot_date() -> NaiveDate {
    FallbackPolicy::default().pivot_date
}
fn default_daily_growth() -> f64 {
    FallbackPolicy::default().daily_growth
}
fn default_jitter_max() -> u32 {
    FallbackPolicy::default().jitter_max
}

fn validate_timeout(field: &str, ms: u64) -> Result<()> {
    if !(100..=30000).contains(&ms) {
        return Err(ProfstatError::Config(format!(
            "{field} must be between 100 and 30000"
        )));
    }
    Ok(())
}
