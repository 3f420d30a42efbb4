//! Browser UI and JSON API over the heatmap pipeline.

pub mod cache;
pub mod error;
pub mod page;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/heatmap", get(routes::heatmap_page))
        .route("/api/heatmap", get(routes::heatmap_json))
        .route("/api/zones", get(routes::list_zones))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
