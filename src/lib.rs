//! Day-ahead electricity price heatmaps for European bidding zones.
//!
//! Fetches day-ahead prices from the ENTSO-E Transparency Platform, aligns
//! each zone onto a 24-hour axis, computes per-zone spreads and renders the
//! result as a Plotly heatmap.
//!
//! # Quick start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use dayahead_heatmap::HeatmapSdk;
//! use dayahead_heatmap::render::{PlotlyPage, Renderer};
//!
//! let sdk = HeatmapSdk::builder().token("my-entsoe-token").build().unwrap();
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//! let heatmap = sdk.heatmap(date, &["DE_LU", "FR"]).unwrap();
//! let html = PlotlyPage::default().render(&heatmap).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod models;
pub mod queries;
pub mod render;
pub mod transform;
#[cfg(feature = "server")]
pub mod web;
pub mod zones;

#[cfg(feature = "async")]
pub use async_client::AsyncHeatmapSdk;
pub use client::{EntsoeClient, PriceSource};
pub use config::Settings;
pub use error::{HeatmapError, Result};
pub use models::{Heatmap, HeatmapMatrix, ZoneSpread};
pub use zones::BiddingZone;

use std::fmt;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tracing::info;

// ---------------------------------------------------------------------------
// HeatmapSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`HeatmapSdk`] instance.
///
/// Use [`HeatmapSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](HeatmapSdkBuilder::build) to create the SDK.
pub struct HeatmapSdkBuilder {
    token: Option<String>,
    api_base: String,
    timeout: Duration,
    source: Option<Box<dyn PriceSource + Send>>,
}

impl Default for HeatmapSdkBuilder {
    fn default() -> Self {
        Self {
            token: None,
            api_base: config::API_BASE.to_string(),
            timeout: Duration::from_secs(config::DEFAULT_TIMEOUT_SECS),
            source: None,
        }
    }
}

impl HeatmapSdkBuilder {
    /// Set the ENTSO-E security token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the API base URL. Defaults to [`config::API_BASE`].
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Apply token, base URL and timeout from loaded [`Settings`].
    pub fn settings(mut self, settings: &Settings) -> Self {
        if let Some(token) = &settings.entsoe_token {
            self.token = Some(token.clone());
        }
        self.api_base = settings.api_base.clone();
        self.timeout = Duration::from_secs(settings.timeout_secs);
        self
    }

    /// Use a custom price provider instead of the ENTSO-E client.
    ///
    /// When set, token, base URL and timeout are ignored.
    pub fn source(mut self, source: impl PriceSource + Send + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Build the SDK.
    ///
    /// Fails with [`HeatmapError::InvalidArgument`] when no custom source was
    /// given and no token is configured.
    pub fn build(self) -> Result<HeatmapSdk> {
        let source = match self.source {
            Some(source) => source,
            None => {
                let token = self.token.ok_or_else(|| {
                    HeatmapError::InvalidArgument(
                        "ENTSO-E token not configured; set `entsoe_token` in secrets.toml or ENTSOE_TOKEN"
                            .into(),
                    )
                })?;
                Box::new(EntsoeClient::new(token, self.api_base, self.timeout)?)
            }
        };
        Ok(HeatmapSdk { source })
    }
}

// ---------------------------------------------------------------------------
// HeatmapSdk
// ---------------------------------------------------------------------------

/// The main entry point: fetch, align and shape day-ahead prices.
///
/// Created via [`HeatmapSdk::builder()`].
pub struct HeatmapSdk {
    source: Box<dyn PriceSource + Send>,
}

impl HeatmapSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> HeatmapSdkBuilder {
        HeatmapSdkBuilder::default()
    }

    /// Access the price query interface.
    pub fn prices(&self) -> queries::prices::PriceQuery<'_> {
        queries::prices::PriceQuery::new(self.source.as_ref())
    }

    /// Build the heatmap for `date` and the selected zone codes.
    ///
    /// Rejects an empty selection and dates after tomorrow before any fetch.
    /// Zones that fail are reported in [`Heatmap::failures`] and have no row.
    pub fn heatmap<S: AsRef<str>>(&self, date: NaiveDate, zones: &[S]) -> Result<Heatmap> {
        validate_request(date, zones, market_today())?;
        let outcome = self.prices().fetch_all(date, zones)?;
        let heatmap = transform::build_heatmap(date, &outcome.series, outcome.failures);
        info!(
            %date,
            rows = heatmap.matrix.zones.len(),
            failed = heatmap.failures.len(),
            "built heatmap"
        );
        Ok(heatmap)
    }
}

impl fmt::Display for HeatmapSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HeatmapSdk(zones={})", BiddingZone::all().len())
    }
}

/// Current delivery day on the market calendar.
pub fn market_today() -> NaiveDate {
    Utc::now().with_timezone(&config::MARKET_TZ).date_naive()
}

/// Check a request before fetching anything.
///
/// Day-ahead prices exist at most one day past `today`.
pub fn validate_request<S: AsRef<str>>(date: NaiveDate, zones: &[S], today: NaiveDate) -> Result<()> {
    if zones.iter().all(|z| z.as_ref().trim().is_empty()) {
        return Err(HeatmapError::EmptySelection);
    }
    let latest = today.succ_opt().unwrap_or(today);
    if date > latest {
        return Err(HeatmapError::InvalidArgument(format!(
            "Day-ahead prices are not available after {latest} (requested {date})"
        )));
    }
    Ok(())
}
