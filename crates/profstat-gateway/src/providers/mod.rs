//! Backing services behind the stats record.
//!
//! Both providers are trait objects so the aggregator can be wired against
//! real HTTP clients in production and in-process stubs in tests.

pub mod counter;
pub mod weather;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use profstat_core::error::{ProfstatError, Result};
use profstat_core::Weather;

pub use counter::{MemoryCounterStore, RestCounterStore, UnconfiguredCounterStore};
pub use weather::OpenWeatherClient;

/// Atomic increment-on-read counter keyed by a string.
#[async_trait]
pub trait CounterStore: Send + Sync {
    fn name(&self) -> &'static str;
    /// Increment `key` and return the post-increment value.
    async fn increment_and_get(&self, key: &str) -> Result<u64>;
}

/// Current-conditions lookup for a location query.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn current_weather(&self, location: &str) -> Result<Weather>;
}

/// Run `fut` with a deadline; on expiry the future is dropped (cancelling any
/// in-flight request) and a timeout error is returned.
pub async fn bounded<T>(
    service: &'static str,
    limit: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => Err(ProfstatError::Timeout {
            service,
            timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}
