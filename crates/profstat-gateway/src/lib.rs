//! profstat gateway library entry.
//!
//! This crate wires config, providers, the stats aggregator, the badge
//! renderer, and the HTTP handlers into one axum service. It is consumed by
//! the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod handlers;
pub mod obs;
pub mod ops;
pub mod providers;
pub mod render;
pub mod router;
pub mod stats;
