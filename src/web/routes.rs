use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::HeatmapError;
use crate::models::Heatmap;
use crate::render::{PlotlyPage, Renderer};
use crate::web::error::AppError;
use crate::web::page;
use crate::web::state::AppState;
use crate::zones::BiddingZone;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Parsed `date`, `zones` and `refresh` parameters.
///
/// `zones` may repeat (`zones=CZ&zones=AT`, as the form submits it) or hold a
/// comma-separated list. A missing `date` means tomorrow.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapParams {
    pub date: NaiveDate,
    pub zones: Vec<String>,
    pub refresh: bool,
}

impl HeatmapParams {
    pub fn from_pairs(pairs: &[(String, String)], today: NaiveDate) -> Result<Self, AppError> {
        let mut date = None;
        let mut zones = Vec::new();
        let mut refresh = false;

        for (key, value) in pairs {
            match key.as_str() {
                "date" if !value.trim().is_empty() => {
                    let parsed = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                        AppError::bad_request(format!("Invalid date '{value}', expected YYYY-MM-DD"))
                    })?;
                    date = Some(parsed);
                }
                "zones" => zones.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|z| !z.is_empty())
                        .map(str::to_uppercase),
                ),
                "refresh" => refresh = matches!(value.as_str(), "1" | "true" | "yes"),
                _ => {}
            }
        }

        Ok(Self {
            date: date.unwrap_or_else(|| default_date(today)),
            zones,
            refresh,
        })
    }

    /// Same query with `refresh=1`, for the "Refresh data" link.
    pub fn refresh_href(&self) -> String {
        format!("/heatmap?date={}&zones={}&refresh=1", self.date, self.zones.join(","))
    }
}

fn default_date(today: NaiveDate) -> NaiveDate {
    today.succ_opt().unwrap_or(today)
}

/// Serve from cache unless `refresh` is set, otherwise build and store.
async fn load_heatmap(state: &AppState, params: &HeatmapParams) -> Result<Heatmap, AppError> {
    let key = (params.date, params.zones.clone());
    if params.refresh {
        state.cache.invalidate(&key);
    } else if let Some(hit) = state.cache.get(&key) {
        debug!(date = %params.date, zones = ?params.zones, "heatmap cache hit");
        return Ok(hit);
    }

    let heatmap = state.sdk.heatmap(params.date, params.zones.clone()).await?;
    state.cache.insert(key, heatmap.clone());
    Ok(heatmap)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /
///
/// Query form with tomorrow and the default zones pre-selected.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let tomorrow = default_date(crate::market_today());
    let form = page::query_form(tomorrow, tomorrow, &state.default_zones);
    Html(page::layout(
        &form,
        &page::banner("info", "Pick a day and zones, then press Show."),
    ))
}

/// GET /heatmap?date=2024-03-15&zones=CZ&zones=AT[&refresh=1]
///
/// Heatmap page with the price table and failure banners.
pub async fn heatmap_page(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let today = crate::market_today();
    let max_date = default_date(today);

    let params = match HeatmapParams::from_pairs(&pairs, today) {
        Ok(params) => params,
        Err(e) => {
            let form = page::query_form(max_date, max_date, &state.default_zones);
            let body = page::banner("error", &e.message);
            return (e.status, Html(page::layout(&form, &body))).into_response();
        }
    };
    let form = page::query_form(params.date, max_date, &params.zones);

    if params.zones.is_empty() {
        let body = page::banner("info", "Please select at least one zone to display data.");
        return (StatusCode::BAD_REQUEST, Html(page::layout(&form, &body))).into_response();
    }

    let heatmap = match load_heatmap(&state, &params).await {
        Ok(heatmap) => heatmap,
        Err(e) => {
            let body = page::banner("error", &e.message);
            return (e.status, Html(page::layout(&form, &body))).into_response();
        }
    };

    let renderer = PlotlyPage {
        plotly_src: state.plotly_src.clone(),
        ..PlotlyPage::default()
    }
    .with_refresh_href(params.refresh_href());

    match renderer.render(&heatmap) {
        Ok(body) => Html(page::layout(&form, &body)).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// GET /api/heatmap?date=2024-03-15&zones=CZ,AT
///
/// The heatmap matrix, spreads and failures as JSON.
pub async fn heatmap_json(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Heatmap>, AppError> {
    let params = HeatmapParams::from_pairs(&pairs, crate::market_today())?;
    if params.zones.is_empty() {
        return Err(HeatmapError::EmptySelection.into());
    }
    Ok(Json(load_heatmap(&state, &params).await?))
}

/// GET /api/zones
pub async fn list_zones() -> Json<Value> {
    let zones: Vec<Value> = BiddingZone::all()
        .iter()
        .map(|z| {
            json!({
                "code": z.code,
                "eic": z.eic,
                "name": z.name,
                "timezone": z.tz.name(),
            })
        })
        .collect();
    let count = zones.len();
    Json(json!({ "data": zones, "count": count }))
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
