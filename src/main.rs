use std::sync::Arc;

use dayahead_heatmap::web::{self, AppState};
use dayahead_heatmap::{AsyncHeatmapSdk, HeatmapSdk, Settings};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let settings = Settings::load()?;
    info!(
        api_base = %settings.api_base,
        cache_ttl_secs = settings.cache_ttl_secs,
        "loaded settings"
    );

    let sdk = HeatmapSdk::builder().settings(&settings).build()?;
    let state = Arc::new(AppState::new(AsyncHeatmapSdk::new(sdk), &settings));
    let app = web::router(state);

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await?;
    Ok(())
}
