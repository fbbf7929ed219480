//! Stats aggregation with per-source fallback.
//!
//! `get_stats` never fails: a counter failure substitutes the synthetic visit
//! count, a weather failure substitutes the fixed fallback weather, and the
//! failure reason lands in the record's diagnostics. The two fetches are
//! independent and run concurrently, each under its own deadline.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use profstat_core::error::Result;
use profstat_core::fallback::{clock_jitter_seed, fallback_weather, FallbackPolicy};
use profstat_core::{Diagnostics, StatsRecord, Weather};

use crate::config::GatewayConfig;
use crate::obs::GatewayMetrics;
use crate::providers::{bounded, CounterStore, WeatherProvider};

/// Fixed inputs of every aggregation.
#[derive(Debug, Clone)]
pub struct AggregatorSettings {
    pub username: String,
    pub location: String,
    pub location_query: String,
    pub counter_key: String,
    pub counter_timeout: Duration,
    pub weather_timeout: Duration,
    pub fallback: FallbackPolicy,
}

impl AggregatorSettings {
    pub fn from_config(cfg: &GatewayConfig) -> Self {
        Self {
            username: cfg.profile.username.clone(),
            location: cfg.profile.location.clone(),
            location_query: cfg.profile.location_query().to_string(),
            counter_key: cfg.counter.key_for(&cfg.profile.username),
            counter_timeout: Duration::from_millis(cfg.counter.timeout_ms),
            weather_timeout: Duration::from_millis(cfg.weather.timeout_ms),
            fallback: cfg.fallback.to_policy(),
        }
    }
}

/// A value plus the reason it is synthetic, if it is.
struct Sourced<T> {
    value: T,
    error: Option<String>,
}

pub struct StatsAggregator {
    counter: Arc<dyn CounterStore>,
    weather: Arc<dyn WeatherProvider>,
    settings: AggregatorSettings,
    metrics: Arc<GatewayMetrics>,
}

impl StatsAggregator {
    pub fn new(
        counter: Arc<dyn CounterStore>,
        weather: Arc<dyn WeatherProvider>,
        settings: AggregatorSettings,
        metrics: Arc<GatewayMetrics>,
    ) -> Self {
        Self { counter, weather, settings, metrics }
    }

    pub fn settings(&self) -> &AggregatorSettings {
        &self.settings
    }

    pub async fn get_stats(&self) -> StatsRecord {
        self.get_stats_at(Utc::now()).await
    }

    /// Aggregate with an explicit clock reading for the timestamp and the
    /// synthetic counter.
    pub async fn get_stats_at(&self, now: DateTime<Utc>) -> StatsRecord {
        let (visits, weather) = tokio::join!(self.visits(now), self.weather());

        StatsRecord {
            username: self.settings.username.clone(),
            visits: visits.value,
            weather: weather.value,
            location: self.settings.location.clone(),
            timestamp: now,
            debug: Diagnostics::from_outcomes(visits.error, weather.error),
        }
    }

    async fn visits(&self, now: DateTime<Utc>) -> Sourced<u64> {
        let res = self
            .observe(
                "counter",
                bounded(
                    "KV store",
                    self.settings.counter_timeout,
                    self.counter.increment_and_get(&self.settings.counter_key),
                ),
            )
            .await;

        match res {
            Ok(value) => {
                debug!(store = self.counter.name(), visits = value, "visit counter ok");
                Sourced { value, error: None }
            }
            Err(e) => {
                let value = self.settings.fallback.synthetic_visits(now, clock_jitter_seed());
                warn!(source = "counter", store = self.counter.name(), reason = %e, visits = value, "visit counter failed, using synthetic count");
                Sourced { value, error: Some(e.to_string()) }
            }
        }
    }

    async fn weather(&self) -> Sourced<Weather> {
        let res = self
            .observe(
                "weather",
                bounded(
                    "Weather API",
                    self.settings.weather_timeout,
                    self.weather.current_weather(&self.settings.location_query),
                ),
            )
            .await;

        match res {
            Ok(value) => {
                debug!(provider = self.weather.name(), temp = value.temp, "weather ok");
                Sourced { value, error: None }
            }
            Err(e) => {
                warn!(source = "weather", provider = self.weather.name(), reason = %e, "weather failed, using fallback");
                Sourced { value: fallback_weather(), error: Some(e.to_string()) }
            }
        }
    }

    async fn observe<T>(
        &self,
        source: &'static str,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        let started = Instant::now();
        let res = fut.await;
        self.metrics
            .fetch_duration
            .observe(&[("source", source)], started.elapsed());
        match &res {
            Ok(_) => self.metrics.fetches.inc(&[("source", source), ("outcome", "live"), ("code", "OK")]),
            Err(e) => self.metrics.fetches.inc(&[
                ("source", source),
                ("outcome", "fallback"),
                ("code", e.client_code().as_str()),
            ]),
        }
        res
    }
}
