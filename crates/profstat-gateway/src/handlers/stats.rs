//! `GET/OPTIONS /stats`: the record as JSON with permissive CORS.

use std::panic::AssertUnwindSafe;

use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use futures_util::FutureExt;
use serde_json::json;

use profstat_core::record::format_timestamp;

use crate::app_state::AppState;

use super::{no_cache_header, panic_message};

fn cors_headers() -> [(HeaderName, &'static str); 4] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, User-Agent, Accept"),
        no_cache_header(),
    ]
}

/// CORS preflight; never touches the providers. Carries the same JSON
/// content type as the other `/stats` responses even though the body is empty.
pub async fn preflight(State(app): State<AppState>) -> Response {
    app.metrics().requests.inc(&[("route", "stats_preflight")]);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        cors_headers(),
    )
        .into_response()
}

pub async fn stats(State(app): State<AppState>) -> Response {
    app.metrics().requests.inc(&[("route", "stats")]);

    let aggregator = app.aggregator();
    match AssertUnwindSafe(aggregator.get_stats()).catch_unwind().await {
        Ok(record) => (StatusCode::OK, cors_headers(), Json(record)).into_response(),
        Err(payload) => {
            let details = panic_message(payload.as_ref());
            tracing::error!(error = %details, "stats aggregation faulted");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                cors_headers(),
                Json(json!({
                    "error": "Stats API failed",
                    "details": details,
                    "timestamp": format_timestamp(&Utc::now()),
                })),
            )
                .into_response()
        }
    }
}
