//! Axum router wiring.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::{app_state::AppState, handlers, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/badge", get(handlers::badge::badge))
        .route("/stats", get(handlers::stats::stats).options(handlers::stats::preflight))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
