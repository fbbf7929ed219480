//! Synthetic visit counter properties over a long horizon.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use chrono::{Duration, TimeZone, Utc};

use profstat_core::fallback::{clock_jitter_seed, FallbackPolicy};

#[test]
fn a_year_of_days_never_goes_backwards() {
    let p = FallbackPolicy::default();
    p.validate().unwrap();

    let start = Utc.with_ymd_and_hms(2025, 1, 1, 23, 59, 0).unwrap();
    let mut prev = p.synthetic_visits(start, p.jitter_max);
    for day in 1..=366 {
        // Worst case: highest jitter yesterday, lowest today.
        let v = p.synthetic_visits(start + Duration::days(day), 0);
        assert!(v >= prev, "day={day} v={v} prev={prev}");
        prev = p.synthetic_visits(start + Duration::days(day), p.jitter_max);
    }
}

#[test]
fn clock_seeded_values_stay_in_band() {
    let p = FallbackPolicy::default();
    let now = Utc.with_ymd_and_hms(2026, 2, 14, 8, 0, 0).unwrap();
    let low = p.synthetic_visits(now, 0);
    for _ in 0..64 {
        let v = p.synthetic_visits(now, clock_jitter_seed());
        assert!((low..=low + u64::from(p.jitter_max)).contains(&v));
    }
}
