//! Synthetic values substituted when a backing service fails.
//!
//! The visit count grows with whole days elapsed since a pivot date plus a
//! small per-call jitter. Monotonicity across days holds as long as the
//! integer part of the daily growth is at least the jitter bound, which
//! [`FallbackPolicy::validate`] enforces.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{ProfstatError, Result};
use crate::record::Weather;

/// Temperature shown when weather is unavailable.
pub const FALLBACK_TEMP: i32 = 22;
pub const FALLBACK_DESCRIPTION: &str = "Loading...";
pub const DEFAULT_ICON: &str = "01d";

/// Weather substituted when the provider fails.
pub fn fallback_weather() -> Weather {
    Weather {
        temp: FALLBACK_TEMP,
        description: FALLBACK_DESCRIPTION.to_string(),
        icon: DEFAULT_ICON.to_string(),
    }
}

/// Parameters of the synthetic visit counter.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackPolicy {
    pub base_count: u64,
    pub pivot_date: NaiveDate,
    /// Visits added per elapsed day.
    pub daily_growth: f64,
    /// Inclusive upper bound of the per-call jitter.
    pub jitter_max: u32,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            base_count: 1500,
            pivot_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            daily_growth: 10.0,
            jitter_max: 9,
        }
    }
}

impl FallbackPolicy {
    pub fn validate(&self) -> Result<()> {
        if !self.daily_growth.is_finite() || self.daily_growth < 0.0 {
            return Err(ProfstatError::Config(
                "fallback.daily_growth must be a finite, non-negative number".into(),
            ));
        }
        // A day's growth must cover the widest possible jitter swing.
        if self.daily_growth.floor() < f64::from(self.jitter_max) {
            return Err(ProfstatError::Config(format!(
                "fallback.daily_growth ({}) must be at least fallback.jitter_max ({})",
                self.daily_growth, self.jitter_max
            )));
        }
        Ok(())
    }

    /// Whole calendar days (UTC) from the pivot to `now`, clamped at zero.
    pub fn days_since_pivot(&self, now: DateTime<Utc>) -> u64 {
        let days = (now.date_naive() - self.pivot_date).num_days();
        u64::try_from(days).unwrap_or(0)
    }

    /// `base + floor(days * growth) + jitter`, with `jitter = seed mod (jitter_max + 1)`.
    pub fn synthetic_visits(&self, now: DateTime<Utc>, jitter_seed: u32) -> u64 {
        let days = self.days_since_pivot(now);
        let growth = (days as f64 * self.daily_growth).floor();
        let growth = if growth.is_finite() && growth > 0.0 { growth as u64 } else { 0 };
        let jitter = u64::from(jitter_seed % self.jitter_max.saturating_add(1).max(1));

        self.base_count.saturating_add(growth).saturating_add(jitter)
    }
}

/// Cheap per-call jitter source taken from the wall clock.
pub fn clock_jitter_seed() -> u32 {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    mix_seed(since_epoch.as_secs(), since_epoch.subsec_nanos())
}

/// Fold seconds, microseconds and nanoseconds together so clocks that tick
/// in whole microseconds (nanos always a multiple of 1000) still vary the
/// low digits.
pub fn mix_seed(secs: u64, nanos: u32) -> u32 {
    (secs as u32)
        .wrapping_add(nanos / 1_000)
        .wrapping_add(nanos)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn pivot_day_yields_base_plus_jitter() {
        let p = FallbackPolicy::default();
        assert_eq!(p.synthetic_visits(at(2025, 1, 1, 12), 0), 1500);
        assert_eq!(p.synthetic_visits(at(2025, 1, 1, 12), 9), 1509);
    }

    #[test]
    fn jitter_stays_within_bound() {
        let p = FallbackPolicy::default();
        let now = at(2025, 6, 1, 0);
        let floor = p.synthetic_visits(now, 0);
        for seed in [1, 7, 9, 10, 123_456, u32::MAX] {
            let v = p.synthetic_visits(now, seed);
            assert!(v >= floor && v <= floor + u64::from(p.jitter_max), "seed={seed} v={v}");
        }
    }

    #[test]
    fn non_decreasing_across_days_for_any_jitter() {
        let p = FallbackPolicy { daily_growth: 2.5, jitter_max: 2, ..FallbackPolicy::default() };
        p.validate().unwrap();

        let mut prev_day_max = 0;
        for day in 1..=40 {
            let now = at(2025, 1, 1, 0) + chrono::Duration::days(day);
            let worst = p.synthetic_visits(now, 0);
            assert!(worst >= prev_day_max, "day={day} worst={worst} prev={prev_day_max}");
            prev_day_max = p.synthetic_visits(now, p.jitter_max);
        }
    }

    #[test]
    fn before_pivot_clamps_to_base() {
        let p = FallbackPolicy::default();
        assert_eq!(p.days_since_pivot(at(2024, 6, 1, 0)), 0);
        assert_eq!(p.synthetic_visits(at(2024, 6, 1, 0), 0), p.base_count);
    }

    #[test]
    fn rejects_growth_smaller_than_jitter() {
        let p = FallbackPolicy { daily_growth: 2.5, jitter_max: 9, ..FallbackPolicy::default() };
        assert!(p.validate().is_err());

        let nan = FallbackPolicy { daily_growth: f64::NAN, ..FallbackPolicy::default() };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn microsecond_clocks_still_spread_jitter() {
        let p = FallbackPolicy::default();
        let now = at(2025, 6, 1, 0);
        let base = p.synthetic_visits(now, 0);

        let mut seen = std::collections::BTreeSet::new();
        for micros in 0..50u32 {
            let seed = mix_seed(1_750_000_000, micros * 1_000);
            seen.insert(p.synthetic_visits(now, seed) - base);
        }
        assert_eq!(seen.len(), 10, "jitter values seen: {seen:?}");
    }

    #[test]
    fn fallback_weather_is_fixed() {
        assert_eq!(
            fallback_weather(),
            Weather { temp: 22, description: "Loading...".into(), icon: "01d".into() }
        );
    }
}
