//! `GET /badge`: always 200 with SVG, the diagnostic panel on failure.

use std::panic::{self, AssertUnwindSafe};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;

use crate::app_state::AppState;
use crate::render::{self, BadgeStep, RequestInfo};

use super::{no_cache_header, panic_message};

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

pub fn request_info(headers: &HeaderMap) -> RequestInfo {
    let text = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    RequestInfo {
        host: text(header::HOST.as_str()),
        protocol: text("x-forwarded-proto").unwrap_or_else(|| "https".to_string()),
    }
}

pub async fn badge(State(app): State<AppState>, headers: HeaderMap) -> Response {
    app.metrics().requests.inc(&[("route", "badge")]);

    let aggregator = app.aggregator();
    let svg = match AssertUnwindSafe(aggregator.get_stats()).catch_unwind().await {
        Err(payload) => diagnostic(&app, &headers, BadgeStep::GettingStats, &panic_message(payload.as_ref())),
        Ok(record) => match panic::catch_unwind(|| render::render(&record)) {
            Ok(Ok(svg)) => svg,
            Ok(Err(e)) => diagnostic(&app, &headers, BadgeStep::GeneratingSvg, &e.to_string()),
            Err(payload) => diagnostic(&app, &headers, BadgeStep::GeneratingSvg, &panic_message(payload.as_ref())),
        },
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, SVG_CONTENT_TYPE), no_cache_header()],
        svg,
    )
        .into_response()
}

fn diagnostic(app: &AppState, headers: &HeaderMap, step: BadgeStep, error: &str) -> String {
    let req = request_info(headers);
    tracing::error!(step = step.as_str(), host = ?req.host, protocol = %req.protocol, error, "badge generation failed");
    app.metrics().badge_diagnostics.inc(&[("step", step.as_str())]);
    render::render_diagnostic(step, &req, error)
}
