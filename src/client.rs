//! Blocking client for the ENTSO-E Transparency Platform REST API.

use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::debug;

use crate::config;
use crate::document;
use crate::error::{HeatmapError, Result};
use crate::models::{PricePoint, PriceSeries};
use crate::zones::BiddingZone;

/// A provider of day-ahead prices.
///
/// `start` and `end` bound the half-open delivery window `[start, end)`.
/// Implementations return the zone's points inside it in zone-local time.
pub trait PriceSource {
    fn day_ahead_prices(
        &self,
        zone: &BiddingZone,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<PriceSeries>;
}

/// ENTSO-E API client. Holds one reusable HTTP connection pool.
pub struct EntsoeClient {
    base_url: String,
    token: String,
    client: Client,
}

impl EntsoeClient {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(HeatmapError::InvalidArgument(
                "ENTSO-E security token is empty".into(),
            ));
        }
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    fn api_url(&self) -> String {
        format!("{}/api", self.base_url)
    }

    /// Issue one A44 query and return the raw response body.
    fn query_day_ahead(&self, eic: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<String> {
        let period_start = format_period(start);
        let period_end = format_period(end);
        debug!(eic, %period_start, %period_end, "querying day-ahead prices");

        let resp = self
            .client
            .get(self.api_url())
            .query(&[
                ("securityToken", self.token.as_str()),
                ("documentType", config::DOCUMENT_TYPE_DAY_AHEAD),
                ("in_Domain", eic),
                ("out_Domain", eic),
                ("periodStart", period_start.as_str()),
                ("periodEnd", period_end.as_str()),
            ])
            .send()?;

        let status = resp.status();
        let body = resp.text()?;
        classify_response(status, body)
    }
}

impl PriceSource for EntsoeClient {
    fn day_ahead_prices(
        &self,
        zone: &BiddingZone,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<PriceSeries> {
        let start_utc = start.with_timezone(&Utc);
        let end_utc = end.with_timezone(&Utc);
        let body = self.query_day_ahead(zone.eic, start_utc, end_utc)?;
        let doc = document::parse_day_ahead(&body)?;

        let points = doc
            .points
            .into_iter()
            .filter(|p| p.timestamp >= start_utc && p.timestamp < end_utc)
            .map(|p| PricePoint {
                timestamp: p.timestamp.with_timezone(&zone.tz),
                price: p.price,
            })
            .collect();

        Ok(PriceSeries {
            zone: zone.code.to_string(),
            currency: doc.currency,
            unit: doc.unit,
            points,
        })
    }
}

/// Map an HTTP status and body onto the error taxonomy.
fn classify_response(status: StatusCode, body: String) -> Result<String> {
    if status.is_success() {
        return Ok(body);
    }

    let message = if document::is_acknowledgement(&body) {
        document::acknowledgement_reason(&body)?
    } else {
        summarize(&body)
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(HeatmapError::Unauthorized(message)),
        StatusCode::TOO_MANY_REQUESTS => Err(HeatmapError::RateLimited(message)),
        _ if message.contains("No matching data found") => Err(HeatmapError::NoData(message)),
        _ => Err(HeatmapError::Api {
            status: status.as_u16(),
            message,
        }),
    }
}

fn summarize(body: &str) -> String {
    let text = body.trim();
    if text.is_empty() {
        return "empty response body".to_string();
    }
    text.chars().take(200).collect()
}

/// ENTSO-E period format: `yyyyMMddHHmm` in UTC.
pub fn format_period(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%d%H%M").to_string()
}
