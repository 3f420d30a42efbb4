//! Async wrapper around [`HeatmapSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs the blocking fetch-and-shape pipeline on Tokio's blocking thread pool
//! via [`tokio::task::spawn_blocking`], keeping the async event loop free.
//! The SDK sits behind a mutex, so requests are processed one at a time.
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use dayahead_heatmap::{AsyncHeatmapSdk, HeatmapSdk};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sdk = HeatmapSdk::builder().token("my-entsoe-token").build().unwrap();
//!     let sdk = AsyncHeatmapSdk::new(sdk);
//!
//!     let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
//!     let heatmap = sdk.heatmap(date, vec!["CZ".into(), "AT".into()]).await.unwrap();
//! }
//! ```

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::error::{HeatmapError, Result};
use crate::models::Heatmap;
use crate::HeatmapSdk;

/// Async wrapper around [`HeatmapSdk`].
///
/// Cloning is cheap and shares the same underlying SDK.
#[derive(Clone)]
pub struct AsyncHeatmapSdk {
    inner: Arc<Mutex<HeatmapSdk>>,
}

impl AsyncHeatmapSdk {
    pub fn new(sdk: HeatmapSdk) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sdk)),
        }
    }

    /// Run a sync SDK operation on the blocking thread pool.
    ///
    /// The closure receives an `&HeatmapSdk` reference and should return
    /// a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&HeatmapSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            // The SDK holds no state a panicking request could leave half-updated.
            let guard = sdk.lock().unwrap_or_else(|e| e.into_inner());
            f(&guard)
        })
        .await
        .map_err(|e| HeatmapError::Task(format!("Task join error: {e}")))?
    }

    /// Build a heatmap asynchronously.
    ///
    /// Convenience wrapper around [`run()`](Self::run) for
    /// [`HeatmapSdk::heatmap()`].
    pub async fn heatmap(&self, date: NaiveDate, zones: Vec<String>) -> Result<Heatmap> {
        self.run(move |s| s.heatmap(date, &zones)).await
    }
}
