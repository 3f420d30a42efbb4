use chrono::NaiveDate;
use serde::Serialize;

pub const HOURS_PER_DAY: usize = 24;

// ---------------------------------------------------------------------------
// HeatmapMatrix — zones × hour-of-day price grid
// ---------------------------------------------------------------------------

/// Rows are zones in selection order, columns are local hours 0..=23.
///
/// A `None` cell means the zone had no price for that hour (for example the
/// skipped hour on a spring-forward day).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapMatrix {
    pub zones: Vec<String>,
    pub hours: Vec<u32>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl Default for HeatmapMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl HeatmapMatrix {
    pub fn new() -> Self {
        Self {
            zones: Vec::new(),
            hours: (0..HOURS_PER_DAY as u32).collect(),
            cells: Vec::new(),
        }
    }

    pub fn push_row(&mut self, zone: impl Into<String>, row: Vec<Option<f64>>) {
        debug_assert_eq!(row.len(), HOURS_PER_DAY);
        self.zones.push(zone.into());
        self.cells.push(row);
    }

    pub fn row(&self, zone: &str) -> Option<&[Option<f64>]> {
        self.zones
            .iter()
            .position(|z| z == zone)
            .map(|i| self.cells[i].as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().flatten().filter_map(|c| *c)
    }

    /// Lowest price across all zones and hours.
    pub fn min(&self) -> Option<f64> {
        self.values().reduce(f64::min)
    }

    /// Highest price across all zones and hours.
    pub fn max(&self) -> Option<f64> {
        self.values().reduce(f64::max)
    }
}

// ---------------------------------------------------------------------------
// ZoneSpread — per-zone daily price range
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSpread {
    pub zone: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub spread: Option<f64>,
}

impl ZoneSpread {
    /// Axis label: zone code over its spread rounded to one decimal.
    pub fn label(&self) -> String {
        match self.spread {
            Some(s) => format!("{}<br>{:.1}", self.zone, s),
            None => format!("{}<br>n/a", self.zone),
        }
    }
}

// ---------------------------------------------------------------------------
// ZoneFailure — a zone left out of the matrix
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Provider answered but had nothing for the day.
    NoData,
    /// Request, transport or parse failure.
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneFailure {
    pub zone: String,
    pub kind: FailureKind,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Heatmap — one request's renderable result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub date: NaiveDate,
    pub matrix: HeatmapMatrix,
    /// Same order as `matrix.zones`.
    pub spreads: Vec<ZoneSpread>,
    pub failures: Vec<ZoneFailure>,
    pub currency: String,
    pub unit: String,
}

impl Heatmap {
    pub fn spread(&self, zone: &str) -> Option<&ZoneSpread> {
        self.spreads.iter().find(|s| s.zone == zone)
    }

    pub fn failed_zones(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.zone.as_str()).collect()
    }
}
