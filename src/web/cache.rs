//! TTL cache of built heatmaps, keyed by date and zone selection.

use std::time::Duration;

use chrono::NaiveDate;
use moka::sync::Cache;

use crate::models::Heatmap;

/// Most (date, zones) selections kept at once.
pub const MAX_ENTRIES: u64 = 256;

pub type CacheKey = (NaiveDate, Vec<String>);

pub struct HeatmapCache {
    entries: Cache<CacheKey, Heatmap>,
}

impl HeatmapCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_ENTRIES)
    }

    pub fn with_capacity(ttl: Duration, max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { entries }
    }

    /// Cached heatmap for `key`, unless it has expired.
    pub fn get(&self, key: &CacheKey) -> Option<Heatmap> {
        self.entries.get(key)
    }

    pub fn insert(&self, key: CacheKey, heatmap: Heatmap) {
        self.entries.insert(key, heatmap);
    }

    pub fn invalidate(&self, key: &CacheKey) {
        self.entries.invalidate(key);
    }

    /// Entries currently held, after pending evictions have run.
    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}
