//! Stats aggregation shared by the badge and JSON endpoints.

pub mod aggregator;

pub use aggregator::{AggregatorSettings, StatsAggregator};
