//! Shared application state for the profstat gateway.
//!
//! Provider clients are built once here and shared by every request. Missing
//! credentials select degraded providers instead of failing startup; only an
//! invalid config or an unbuildable HTTP client is a startup error.

use std::sync::Arc;

use profstat_core::error::Result;

use crate::config::{env_credential, CounterBackend, GatewayConfig};
use crate::obs::GatewayMetrics;
use crate::providers::{
    CounterStore, MemoryCounterStore, OpenWeatherClient, RestCounterStore,
    UnconfiguredCounterStore, WeatherProvider,
};
use crate::stats::{AggregatorSettings, StatsAggregator};

#[derive(Clone)]
pub struct AppState {
    aggregator: Arc<StatsAggregator>,
    metrics: Arc<GatewayMetrics>,
}

impl AppState {
    /// Build state from config, resolving credentials from the environment.
    pub fn new(cfg: &GatewayConfig) -> Result<Self> {
        let counter = build_counter(cfg)?;

        let api_key = env_credential(&cfg.weather.api_key_env);
        let weather = OpenWeatherClient::new(
            cfg.weather.endpoint.clone(),
            api_key,
            &cfg.weather.user_agent,
        )?;
        if !weather.has_credential() {
            tracing::warn!(env = %cfg.weather.api_key_env, "weather credential not set; weather will use fallback");
        }

        tracing::info!(counter = counter.name(), "providers ready");
        Ok(Self::with_providers(counter, Arc::new(weather), AggregatorSettings::from_config(cfg)))
    }

    /// Build state around explicit providers.
    pub fn with_providers(
        counter: Arc<dyn CounterStore>,
        weather: Arc<dyn WeatherProvider>,
        settings: AggregatorSettings,
    ) -> Self {
        let metrics = Arc::new(GatewayMetrics::default());
        let aggregator = Arc::new(StatsAggregator::new(counter, weather, settings, metrics.clone()));
        Self { aggregator, metrics }
    }

    pub fn aggregator(&self) -> Arc<StatsAggregator> {
        Arc::clone(&self.aggregator)
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }
}

fn build_counter(cfg: &GatewayConfig) -> Result<Arc<dyn CounterStore>> {
    let c = &cfg.counter;
    match c.backend {
        CounterBackend::Memory => Ok(Arc::new(MemoryCounterStore::new())),
        CounterBackend::Rest => {
            match (env_credential(&c.url_env), env_credential(&c.token_env)) {
                (Some(url), Some(token)) => Ok(Arc::new(RestCounterStore::new(&url, token)?)),
                _ => {
                    tracing::warn!(url_env = %c.url_env, token_env = %c.token_env, "counter credentials not set; visits will use synthetic count");
                    Ok(Arc::new(UnconfiguredCounterStore))
                }
            }
        }
    }
}
