//! Minimal metrics registry for the gateway.
//!
//! Counters and histograms with dynamic labels backed by `DashMap`. Labels are
//! flattened into sorted key vectors to keep deterministic ordering. Histogram
//! buckets are fixed in milliseconds; upstream calls are bounded by timeouts
//! of at most 30s so the top bucket covers every observation that completes.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &[(String, String)]) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        let counter = self.map.entry(label_key(labels)).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Current value for an exact label set (0 when never incremented).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        for r in self.map.iter() {
            let val = r.value().load(Ordering::Relaxed);
            let _ = writeln!(out, "{}{{{}}} {}", name, label_str(r.key()), val);
        }
    }
}

// 10ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s, 30s
const BUCKETS_MILLIS: [u64; 10] = [10, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 30_000];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 10],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<Vec<(String, String)>, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration and increment cumulative buckets (millisecond scale).
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self.map.entry(label_key(labels)).or_default();
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(millis, Ordering::Relaxed);

        for (bucket, &le) in hist.buckets.iter().zip(BUCKETS_MILLIS.iter()) {
            if millis <= le {
                bucket.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} histogram", name);
        for r in self.map.iter() {
            let hist = r.value();
            let labels = label_str(r.key());
            let prefix = if labels.is_empty() { String::new() } else { format!("{},", labels) };

            for (bucket, &le) in hist.buckets.iter().zip(BUCKETS_MILLIS.iter()) {
                let count = bucket.load(Ordering::Relaxed);
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, count);

            let sum = hist.sum.load(Ordering::Relaxed);
            let _ = writeln!(out, "{}_sum{{{}}} {}", name, labels, sum);
            let _ = writeln!(out, "{}_count{{{}}} {}", name, labels, count);
        }
    }
}

#[derive(Default)]
pub struct GatewayMetrics {
    /// Labels: route.
    pub requests: CounterVec,
    /// Labels: source (counter|weather), outcome (live|fallback), code.
    pub fetches: CounterVec,
    /// Labels: source.
    pub fetch_duration: HistogramVec,
    /// Labels: step.
    pub badge_diagnostics: CounterVec,
    draining: AtomicBool,
}

impl GatewayMetrics {
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    /// Render all registered metrics in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.requests.render("profstat_requests_total", &mut out);
        self.fetches.render("profstat_fetches_total", &mut out);
        self.fetch_duration.render("profstat_fetch_duration_millis", &mut out);
        self.badge_diagnostics.render("profstat_badge_diagnostics_total", &mut out);

        let _ = writeln!(
            out,
            "# TYPE profstat_draining gauge\nprofstat_draining {}",
            if self.is_draining() { 1 } else { 0 }
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_label_order_independent() {
        let m = GatewayMetrics::default();
        m.fetches.inc(&[("source", "weather"), ("outcome", "fallback")]);
        m.fetches.inc(&[("outcome", "fallback"), ("source", "weather")]);
        assert_eq!(m.fetches.get(&[("source", "weather"), ("outcome", "fallback")]), 2);
        assert_eq!(m.fetches.get(&[("source", "counter"), ("outcome", "live")]), 0);
    }

    #[test]
    fn histogram_buckets_are_cumulative() {
        let m = GatewayMetrics::default();
        m.fetch_duration.observe(&[("source", "weather")], Duration::from_millis(120));
        let out = m.render();
        assert!(out.contains("profstat_fetch_duration_millis_bucket{source=\"weather\",le=\"100\"} 0"));
        assert!(out.contains("profstat_fetch_duration_millis_bucket{source=\"weather\",le=\"250\"} 1"));
        assert!(out.contains("profstat_fetch_duration_millis_bucket{source=\"weather\",le=\"+Inf\"} 1"));
        assert!(out.contains("profstat_fetch_duration_millis_count{source=\"weather\"} 1"));
    }

    #[test]
    fn draining_gauge_flips() {
        let m = GatewayMetrics::default();
        assert!(m.render().contains("profstat_draining 0"));
        m.set_draining();
        assert!(m.render().contains("profstat_draining 1"));
    }
}
