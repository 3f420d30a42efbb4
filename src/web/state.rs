use std::time::Duration;

use crate::async_client::AsyncHeatmapSdk;
use crate::config::Settings;
use crate::render::PLOTLY_CDN;
use crate::web::cache::HeatmapCache;

/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Runs the blocking fetch pipeline on the blocking thread pool.
    pub sdk: AsyncHeatmapSdk,

    /// Built heatmaps by (date, zones), so reloading a page does not refetch.
    pub cache: HeatmapCache,

    /// Zones pre-selected on the query form.
    pub default_zones: Vec<String>,

    /// Plotly.js script URL embedded in rendered pages.
    pub plotly_src: String,
}

impl AppState {
    pub fn new(sdk: AsyncHeatmapSdk, settings: &Settings) -> Self {
        Self {
            sdk,
            cache: HeatmapCache::new(Duration::from_secs(settings.cache_ttl_secs)),
            default_zones: settings.default_zones.clone(),
            plotly_src: PLOTLY_CDN.to_string(),
        }
    }
}
