//! Real HTTP provider clients against a mock upstream.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{any, bearer_token, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use profstat_core::fallback::fallback_weather;
use profstat_core::Weather;
use profstat_gateway::app_state::AppState;
use profstat_gateway::config;
use profstat_gateway::obs::GatewayMetrics;
use profstat_gateway::providers::{CounterStore, OpenWeatherClient, RestCounterStore, WeatherProvider};
use profstat_gateway::router::build_router;
use profstat_gateway::stats::{AggregatorSettings, StatsAggregator};

const UA: &str = "GitHub-Profile-Counter/1.0";

fn settings() -> AggregatorSettings {
    let cfg = config::load_from_str(
        r#"
version: 1
profile: { username: "bh1090", location: "Toronto", location_query: "Toronto,CA" }
"#,
    )
    .unwrap();
    AggregatorSettings::from_config(&cfg)
}

fn weather_client(server: &MockServer, key: Option<&str>) -> OpenWeatherClient {
    OpenWeatherClient::new(format!("{}/data/2.5/weather", server.uri()), key.map(String::from), UA)
        .unwrap()
}

#[tokio::test]
async fn weather_client_sends_query_and_parses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Toronto,CA"))
        .and(query_param("appid", "secret"))
        .and(query_param("units", "metric"))
        .and(header("user-agent", UA))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "main": { "temp": 3.49 },
            "weather": [{ "main": "Mist", "icon": "50n" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let w = weather_client(&server, Some("secret"))
        .current_weather("Toronto,CA")
        .await
        .unwrap();
    assert_eq!(w, Weather { temp: 3, description: "Mist".into(), icon: "50n".into() });
}

#[tokio::test]
async fn weather_client_reports_http_status() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "cod": 401 })))
        .mount(&server)
        .await;

    let err = weather_client(&server, Some("wrong"))
        .current_weather("Toronto,CA")
        .await
        .expect_err("401 must fail");
    assert_eq!(err.to_string(), "Weather API HTTP 401");
}

#[tokio::test]
async fn weather_client_without_key_never_calls_out() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = weather_client(&server, None)
        .current_weather("Toronto,CA")
        .await
        .expect_err("no key");
    assert_eq!(err.client_code().as_str(), "MISSING_CREDENTIAL");
}

#[tokio::test]
async fn slow_weather_falls_back_after_timeout() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "main": { "temp": 30.0 } }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut s = settings();
    s.weather_timeout = Duration::from_millis(200);
    let counter: Arc<dyn CounterStore> = Arc::new(profstat_gateway::providers::MemoryCounterStore::new());
    let weather: Arc<dyn WeatherProvider> = Arc::new(weather_client(&server, Some("k")));
    let agg = StatsAggregator::new(counter, weather, s, Arc::new(GatewayMetrics::default()));

    let rec = agg.get_stats().await;
    assert_eq!(rec.weather, fallback_weather());
    assert_eq!(
        rec.debug.weather_error.as_deref(),
        Some("Weather API request timed out after 200ms")
    );
}

#[tokio::test]
async fn rest_counter_increments_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/incr/profile-views-bh1090"))
        .and(bearer_token("kv-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": 77 })))
        .expect(1)
        .mount(&server)
        .await;

    let store = RestCounterStore::new(&server.uri(), "kv-token".into()).unwrap();
    assert_eq!(store.increment_and_get("profile-views-bh1090").await.unwrap(), 77);
}

#[tokio::test]
async fn rest_counter_surfaces_store_errors() {
    let server = MockServer::start().await;
    Mock::given(path("/incr/a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "WRONGTYPE" })))
        .mount(&server)
        .await;
    Mock::given(path("/incr/b"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let store = RestCounterStore::new(&server.uri(), "t".into()).unwrap();

    let err = store.increment_and_get("a").await.expect_err("error payload");
    assert_eq!(err.to_string(), "KV store request failed: WRONGTYPE");

    let err = store.increment_and_get("b").await.expect_err("status");
    assert_eq!(err.to_string(), "KV store HTTP 401");
}

#[tokio::test]
async fn end_to_end_live_counter_and_weather() {
    let kv = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/incr/profile-views-bh1090"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": 5 })))
        .mount(&kv)
        .await;

    let owm = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "temp": 18.6,
            "weather": [{ "main": "Clouds", "icon": "03d" }]
        })))
        .mount(&owm)
        .await;

    let state = AppState::with_providers(
        Arc::new(RestCounterStore::new(&kv.uri(), "t".into()).unwrap()),
        Arc::new(weather_client(&owm, Some("k"))),
        settings(),
    );
    let response = build_router(state)
        .oneshot(Request::get("/stats").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["visits"], 5);
    assert_eq!(v["weather"], json!({ "temp": 19, "description": "Clouds", "icon": "03d" }));
    assert_eq!(v["debug"]["visitCounterWorking"], true);
    assert_eq!(v["debug"]["weatherWorking"], true);
}
