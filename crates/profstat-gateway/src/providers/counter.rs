//! Visit counter stores.
//!
//! - `RestCounterStore`: Redis-over-REST (`POST {base}/incr/{key}`, bearer
//!   token, `{"result": n}` body) as exposed by Upstash and Vercel KV.
//! - `UnconfiguredCounterStore`: stands in when the REST credentials are
//!   missing so the aggregator still degrades instead of the process aborting.
//! - `MemoryCounterStore`: in-process atomics for local runs and tests.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Url;
use serde::Deserialize;

use profstat_core::error::{ProfstatError, Result};

use super::CounterStore;

const SERVICE: &str = "KV store";

#[derive(Debug, Deserialize)]
struct IncrResponse {
    #[serde(default)]
    result: Option<i64>,
    #[serde(default)]
    error: Option<String>,
}

pub struct RestCounterStore {
    client: reqwest::Client,
    base: Url,
    token: String,
}

impl RestCounterStore {
    pub fn new(base_url: &str, token: String) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ProfstatError::Config(format!("counter url {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ProfstatError::Config(format!(
                "counter url {base_url:?} cannot carry a path"
            )));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProfstatError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self { client, base, token })
    }

    fn incr_url(&self, key: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ProfstatError::Config("counter url cannot carry a path".into()))?
            .pop_if_empty()
            .push("incr")
            .push(key);
        Ok(url)
    }
}

#[async_trait]
impl CounterStore for RestCounterStore {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn increment_and_get(&self, key: &str) -> Result<u64> {
        let url = self.incr_url(key)?;
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ProfstatError::Upstream { service: SERVICE, reason: e.to_string() })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProfstatError::UpstreamStatus { service: SERVICE, status: status.as_u16() });
        }

        let body: IncrResponse = resp
            .json()
            .await
            .map_err(|e| ProfstatError::Decode { service: SERVICE, reason: e.to_string() })?;

        match body {
            IncrResponse { error: Some(reason), .. } => {
                Err(ProfstatError::Upstream { service: SERVICE, reason })
            }
            IncrResponse { result: Some(n), .. } => u64::try_from(n).map_err(|_| ProfstatError::Decode {
                service: SERVICE,
                reason: format!("negative counter value {n}"),
            }),
            IncrResponse { result: None, error: None } => Err(ProfstatError::Decode {
                service: SERVICE,
                reason: "missing result".into(),
            }),
        }
    }
}

/// Always fails with a configuration error.
#[derive(Debug, Default)]
pub struct UnconfiguredCounterStore;

#[async_trait]
impl CounterStore for UnconfiguredCounterStore {
    fn name(&self) -> &'static str {
        "unconfigured"
    }

    async fn increment_and_get(&self, _key: &str) -> Result<u64> {
        Err(ProfstatError::MissingCredential(
            "KV not available - check environment variables".into(),
        ))
    }
}

#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    counters: DashMap<String, AtomicU64>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key, e.g. to continue from a known count.
    pub fn seed(&self, key: impl Into<String>, value: u64) {
        self.counters.insert(key.into(), AtomicU64::new(value));
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn increment_and_get(&self, key: &str) -> Result<u64> {
        let counter = self
            .counters
            .entry(key.to_string())
            .or_insert_with(|| AtomicU64::new(0));
        Ok(counter.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
