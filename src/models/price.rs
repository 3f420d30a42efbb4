use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

// ---------------------------------------------------------------------------
// PricePoint — Single zone-local price observation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Tz>,
    pub price: f64,
}

// ---------------------------------------------------------------------------
// PriceSeries — One zone's day-ahead prices for a delivery day
// ---------------------------------------------------------------------------

/// Day-ahead prices for one bidding zone, ordered by timestamp.
///
/// Holds 24 hourly points on a regular day, 23 or 25 on DST-transition days,
/// or four times as many at quarter-hour resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    pub zone: String,
    pub currency: Option<String>,
    pub unit: Option<String>,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(zone: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            zone: zone.into(),
            currency: None,
            unit: None,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
