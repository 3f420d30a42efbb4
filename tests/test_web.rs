//! Web UI and JSON API tests against the router with a stub price source.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::Router;
use common::{date, ramp, Reply, StubSource};
use dayahead_heatmap::transform::build_heatmap;
use dayahead_heatmap::web::cache::HeatmapCache;
use dayahead_heatmap::web::routes::HeatmapParams;
use dayahead_heatmap::web::{self, AppError, AppState};
use dayahead_heatmap::{AsyncHeatmapSdk, HeatmapError, HeatmapSdk, Settings};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn app() -> (Router, Arc<Mutex<Vec<String>>>) {
    app_with_ttl(Duration::from_secs(Settings::default().cache_ttl_secs))
}

fn app_with_ttl(ttl: Duration) -> (Router, Arc<Mutex<Vec<String>>>) {
    let source = StubSource::new()
        .with("CZ", Reply::Hourly(ramp(24, 50.0, 1.0)))
        .with("AT", Reply::Hourly(ramp(24, 30.0, 2.0)))
        .with("PL", Reply::Fail("maintenance"))
        .with("HU", Reply::Unauthorized);
    let calls = source.calls();
    let sdk = HeatmapSdk::builder().source(source).build().unwrap();
    let mut state = AppState::new(AsyncHeatmapSdk::new(sdk), &Settings::default());
    state.cache = HeatmapCache::new(ttl);
    (web::router(Arc::new(state)), calls)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_is_ok() {
    let (app, _) = app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn index_preselects_default_zones() {
    let (app, calls) = app();
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"value="CZ" checked"#));
    assert!(body.contains(r#"value="DE_LU" checked"#));
    assert!(body.contains(r#"value="HU">"#));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn heatmap_page_renders_chart_and_failure_banner() {
    let (app, _) = app();
    let (status, body) = get(&app, "/heatmap?date=2024-03-15&zones=CZ&zones=AT&zones=PL").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Plotly.newPlot"));
    assert!(body.contains("Could not load data for: <b>PL</b>"));
    assert!(body.contains("refresh=1"));
    assert!(body.contains(r#"value="2024-03-15""#));
}

#[tokio::test]
async fn empty_selection_shows_prompt_without_fetching() {
    let (app, calls) = app();
    let (status, body) = get(&app, "/heatmap?date=2024-03-15").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Please select at least one zone"));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_date_is_a_bad_request() {
    let (app, _) = app();
    let (status, body) = get(&app, "/heatmap?date=15.03.2024&zones=CZ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid date"));
}

#[tokio::test]
async fn unauthorized_zone_is_reported_and_earlier_rows_kept() {
    let (app, calls) = app();
    let (status, body) = get(&app, "/heatmap?date=2024-03-15&zones=CZ,HU,AT").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Plotly.newPlot"));
    assert!(body.contains("Could not load data for: <b>HU, AT</b>"));
    assert!(body.contains("security token"));
    assert_eq!(*calls.lock().unwrap(), vec!["CZ", "HU"]);
}

// ---------------------------------------------------------------------------
// JSON API
// ---------------------------------------------------------------------------

#[tokio::test]
async fn api_heatmap_returns_matrix_and_spreads() {
    let (app, _) = app();
    let (status, body) = get(&app, "/api/heatmap?date=2024-03-15&zones=CZ,AT,PL").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["date"], "2024-03-15");
    assert_eq!(json["matrix"]["zones"], serde_json::json!(["CZ", "AT"]));
    assert_eq!(json["matrix"]["hours"].as_array().unwrap().len(), 24);
    assert_eq!(json["matrix"]["cells"][0].as_array().unwrap().len(), 24);
    assert_eq!(json["spreads"][0]["spread"], 23.0);
    assert_eq!(json["spreads"][1]["spread"], 46.0);
    assert_eq!(json["failures"][0]["zone"], "PL");
    assert_eq!(json["failures"][0]["kind"], "error");
}

#[tokio::test]
async fn api_heatmap_rejects_empty_selection() {
    let (app, calls) = app();
    let (status, body) = get(&app, "/api/heatmap?date=2024-03-15&zones=").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("at least one bidding zone"));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn api_zones_lists_known_zones() {
    let (app, _) = app();
    let (status, body) = get(&app, "/api/zones").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    let zones = json["data"].as_array().unwrap();
    assert_eq!(json["count"], zones.len());
    assert!(zones
        .iter()
        .any(|z| z["code"] == "DE_LU" && z["timezone"] == "Europe/Berlin"));
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repeated_request_is_served_from_cache_until_refresh() {
    let (app, calls) = app();
    let uri = "/api/heatmap?date=2024-03-15&zones=CZ";

    get(&app, uri).await;
    get(&app, uri).await;
    assert_eq!(calls.lock().unwrap().len(), 1);

    get(&app, "/api/heatmap?date=2024-03-15&zones=CZ&refresh=1").await;
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn expired_entry_is_fetched_again() {
    let (app, calls) = app_with_ttl(Duration::from_millis(50));
    let uri = "/api/heatmap?date=2024-03-15&zones=CZ";

    get(&app, uri).await;
    get(&app, uri).await;
    assert_eq!(calls.lock().unwrap().len(), 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    get(&app, uri).await;
    assert_eq!(calls.lock().unwrap().len(), 2);
}

#[test]
fn cache_entries_expire_after_ttl() {
    let cache = HeatmapCache::new(Duration::from_millis(50));
    let key = (date(2024, 3, 15), vec!["CZ".to_string()]);
    cache.insert(key.clone(), build_heatmap(date(2024, 3, 15), &[], Vec::new()));
    assert!(cache.get(&key).is_some());

    std::thread::sleep(Duration::from_millis(200));
    assert!(cache.get(&key).is_none());
}

#[test]
fn cache_is_bounded() {
    let cache = HeatmapCache::with_capacity(Duration::from_secs(3600), 4);
    for day in 1..=20 {
        let d = date(2024, 3, day);
        cache.insert((d, vec!["CZ".to_string()]), build_heatmap(d, &[], Vec::new()));
    }
    assert!(cache.entry_count() <= 4);
}

#[test]
fn invalidate_removes_entry() {
    let cache = HeatmapCache::new(Duration::from_secs(3600));
    let key = (date(2024, 3, 15), vec!["AT".to_string()]);
    cache.insert(key.clone(), build_heatmap(date(2024, 3, 15), &[], Vec::new()));
    cache.invalidate(&key);
    assert!(cache.get(&key).is_none());
}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

#[test]
fn errors_map_to_http_status() {
    let status = |e: HeatmapError| AppError::from(e).status;
    assert_eq!(status(HeatmapError::EmptySelection), StatusCode::BAD_REQUEST);
    assert_eq!(status(HeatmapError::InvalidArgument("x".into())), StatusCode::BAD_REQUEST);
    assert_eq!(status(HeatmapError::NoData("x".into())), StatusCode::NOT_FOUND);
    assert_eq!(status(HeatmapError::Unauthorized("x".into())), StatusCode::BAD_GATEWAY);
    assert_eq!(status(HeatmapError::RateLimited("x".into())), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(status(HeatmapError::Task("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn app_error_renders_json_body() {
    let resp = AppError::bad_request("Invalid date").into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"], "Invalid date");
}

// ---------------------------------------------------------------------------
// HeatmapParams
// ---------------------------------------------------------------------------

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn params_merge_repeated_and_comma_separated_zones() {
    let params = HeatmapParams::from_pairs(
        &pairs(&[("zones", "cz, at"), ("zones", "PL"), ("date", "2024-03-15")]),
        date(2024, 3, 14),
    )
    .unwrap();
    assert_eq!(params.zones, vec!["CZ", "AT", "PL"]);
    assert_eq!(params.date, date(2024, 3, 15));
    assert!(!params.refresh);
    assert_eq!(
        params.refresh_href(),
        "/heatmap?date=2024-03-15&zones=CZ,AT,PL&refresh=1"
    );
}

#[test]
fn params_default_date_is_tomorrow() {
    let params =
        HeatmapParams::from_pairs(&pairs(&[("zones", "CZ"), ("refresh", "1")]), date(2024, 3, 14))
            .unwrap();
    assert_eq!(params.date, date(2024, 3, 15));
    assert!(params.refresh);
}
