//! Parsing of ENTSO-E market documents.
//!
//! A day-ahead query answers with either a `Publication_MarketDocument`
//! (one or more `TimeSeries`, each with `Period`s of positioned `Point`s) or
//! an `Acknowledgement_MarketDocument` explaining why nothing was returned.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::Deserialize;

use crate::error::{HeatmapError, Result};

/// Curve type where positions equal to the previous one are omitted.
const CURVE_SEQUENTIAL_FIXED_BLOCKS: &str = "A03";

#[derive(Debug, Deserialize)]
struct PublicationDocument {
    #[serde(rename = "TimeSeries", default)]
    time_series: Vec<TimeSeries>,
}

#[derive(Debug, Deserialize)]
struct TimeSeries {
    #[serde(rename = "currency_Unit.name")]
    currency: Option<String>,
    #[serde(rename = "price_Measure_Unit.name")]
    unit: Option<String>,
    #[serde(rename = "curveType")]
    curve_type: Option<String>,
    #[serde(rename = "Period", default)]
    periods: Vec<Period>,
}

#[derive(Debug, Deserialize)]
struct Period {
    #[serde(rename = "timeInterval")]
    interval: TimeInterval,
    resolution: String,
    #[serde(rename = "Point", default)]
    points: Vec<Point>,
}

#[derive(Debug, Deserialize)]
struct TimeInterval {
    start: String,
    end: String,
}

#[derive(Debug, Deserialize)]
struct Point {
    position: u32,
    #[serde(rename = "price.amount")]
    price: f64,
}

#[derive(Debug, Deserialize)]
struct AcknowledgementDocument {
    #[serde(rename = "Reason", default)]
    reasons: Vec<Reason>,
}

#[derive(Debug, Deserialize)]
struct Reason {
    code: Option<String>,
    text: Option<String>,
}

// ---------------------------------------------------------------------------
// Public output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Flattened contents of a publication document.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceDocument {
    pub currency: Option<String>,
    pub unit: Option<String>,
    /// Ordered by timestamp, one entry per instant.
    pub points: Vec<RawPoint>,
}

/// Whether the body is an acknowledgement rather than a publication.
pub fn is_acknowledgement(body: &str) -> bool {
    body.contains("Acknowledgement_MarketDocument")
}

/// Human-readable reason(s) from an acknowledgement document.
pub fn acknowledgement_reason(body: &str) -> Result<String> {
    let doc: AcknowledgementDocument = quick_xml::de::from_str(body)?;
    let reasons: Vec<String> = doc
        .reasons
        .into_iter()
        .filter_map(|r| match (r.code, r.text) {
            (Some(code), Some(text)) => Some(format!("{text} (code {code})")),
            (None, Some(text)) => Some(text),
            (Some(code), None) => Some(format!("code {code}")),
            (None, None) => None,
        })
        .collect();
    if reasons.is_empty() {
        Ok("acknowledgement without reason".to_string())
    } else {
        Ok(reasons.join("; "))
    }
}

/// Parse a day-ahead price response.
///
/// Acknowledgement documents become [`HeatmapError::NoData`]. When several
/// time series cover the same instant, the first one wins.
pub fn parse_day_ahead(body: &str) -> Result<PriceDocument> {
    if is_acknowledgement(body) {
        return Err(HeatmapError::NoData(acknowledgement_reason(body)?));
    }

    let doc: PublicationDocument = quick_xml::de::from_str(body)?;

    let mut currency = None;
    let mut unit = None;
    let mut by_instant: BTreeMap<DateTime<Utc>, f64> = BTreeMap::new();

    for series in doc.time_series {
        currency = currency.or(series.currency);
        unit = unit.or(series.unit);
        let fill = series.curve_type.as_deref() == Some(CURVE_SEQUENTIAL_FIXED_BLOCKS);

        for period in series.periods {
            for point in expand_period(&period, fill)? {
                by_instant.entry(point.timestamp).or_insert(point.price);
            }
        }
    }

    Ok(PriceDocument {
        currency,
        unit,
        points: by_instant
            .into_iter()
            .map(|(timestamp, price)| RawPoint { timestamp, price })
            .collect(),
    })
}

/// Upper bound on the slots one period may expand to (a leap year of quarter-hours).
const MAX_PERIOD_SLOTS: i64 = 366 * 24 * 4;

/// Turn positioned points into timestamps.
///
/// With `fill`, every slot of the interval is emitted and a missing position
/// repeats the previous price. Positions or intervals that do not fit the
/// calendar are rejected with [`HeatmapError::InvalidArgument`].
fn expand_period(period: &Period, fill: bool) -> Result<Vec<RawPoint>> {
    let start = parse_instant(&period.interval.start)?;
    let end = parse_instant(&period.interval.end)?;
    let step = parse_resolution(&period.resolution)?;

    let mut points: Vec<&Point> = period.points.iter().filter(|p| p.position > 0).collect();
    points.sort_by_key(|p| p.position);

    let at = |position: u32| -> Result<DateTime<Utc>> {
        i32::try_from(position - 1)
            .ok()
            .and_then(|offset| step.checked_mul(offset))
            .and_then(|delta| start.checked_add_signed(delta))
            .ok_or_else(|| {
                HeatmapError::InvalidArgument(format!(
                    "Position {position} at {} from {start} is out of range",
                    period.resolution.trim()
                ))
            })
    };

    if !fill {
        return points
            .into_iter()
            .map(|p| {
                Ok(RawPoint {
                    timestamp: at(p.position)?,
                    price: p.price,
                })
            })
            .collect();
    }

    let slots = ((end - start).num_seconds() / step.num_seconds()).max(0);
    if slots > MAX_PERIOD_SLOTS {
        return Err(HeatmapError::InvalidArgument(format!(
            "Period {start}/{end} at {} has too many positions",
            period.resolution.trim()
        )));
    }
    let slots = slots as u32;

    let mut out = Vec::with_capacity(slots as usize);
    let mut given = points.into_iter().peekable();
    let mut last: Option<f64> = None;

    for position in 1..=slots {
        while let Some(p) = given.peek() {
            if p.position > position {
                break;
            }
            last = Some(p.price);
            given.next();
        }
        if let Some(price) = last {
            out.push(RawPoint {
                timestamp: at(position)?,
                price,
            });
        }
    }
    Ok(out)
}

/// Parse an ENTSO-E instant such as `2024-03-14T23:00Z`.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ") {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| HeatmapError::InvalidArgument(format!("Invalid instant '{s}': {e}")))
}

/// Parse an ISO 8601 resolution such as `PT60M`, `PT15M`, `PT1H` or `P1D`.
pub fn parse_resolution(s: &str) -> Result<TimeDelta> {
    let invalid = || HeatmapError::InvalidArgument(format!("Unsupported resolution '{s}'"));
    let s = s.trim();

    let delta = if let Some(rest) = s.strip_prefix("PT") {
        if let Some(n) = rest.strip_suffix('M') {
            TimeDelta::try_minutes(n.parse().map_err(|_| invalid())?)
        } else if let Some(n) = rest.strip_suffix('H') {
            TimeDelta::try_hours(n.parse().map_err(|_| invalid())?)
        } else {
            return Err(invalid());
        }
    } else if let Some(n) = s.strip_prefix('P').and_then(|r| r.strip_suffix('D')) {
        TimeDelta::try_days(n.parse().map_err(|_| invalid())?)
    } else {
        return Err(invalid());
    }
    .ok_or_else(invalid)?;

    if delta <= TimeDelta::zero() {
        return Err(invalid());
    }
    Ok(delta)
}
