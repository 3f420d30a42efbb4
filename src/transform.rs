//! Shaping of per-zone price series into a heatmap matrix with spreads.

use chrono::{NaiveDate, Timelike};
use tracing::warn;

use crate::models::{
    FailureKind, Heatmap, HeatmapMatrix, PriceSeries, ZoneFailure, ZoneSpread, HOURS_PER_DAY,
};

/// Bucket a series onto the 24 local hours of `date`.
///
/// Several points in one hour (sub-hourly resolution, or the repeated hour
/// of a fall-back day) are averaged. Hours without points, such as the
/// skipped hour of a spring-forward day, stay `None`. Points on other local
/// dates are ignored.
pub fn align_hourly(series: &PriceSeries, date: NaiveDate) -> Vec<Option<f64>> {
    let mut sums = [0.0_f64; HOURS_PER_DAY];
    let mut counts = [0_u32; HOURS_PER_DAY];

    for point in &series.points {
        if point.timestamp.date_naive() != date || !point.price.is_finite() {
            continue;
        }
        let hour = point.timestamp.hour() as usize;
        sums[hour] += point.price;
        counts[hour] += 1;
    }

    sums.iter()
        .zip(counts.iter())
        .map(|(sum, &n)| (n > 0).then(|| sum / n as f64))
        .collect()
}

/// Daily min, max and spread over the non-missing hours of a row.
pub fn zone_spread(zone: &str, row: &[Option<f64>]) -> ZoneSpread {
    let values = || row.iter().filter_map(|c| *c);
    let min = values().reduce(f64::min);
    let max = values().reduce(f64::max);
    let spread = match (min, max) {
        (Some(lo), Some(hi)) => Some(hi - lo),
        _ => None,
    };
    ZoneSpread {
        zone: zone.to_string(),
        min,
        max,
        spread,
    }
}

/// Stack aligned series into a [`Heatmap`].
///
/// Row order follows `series`. A series with no point on `date` gets no row
/// and is reported as a [`FailureKind::NoData`] failure.
pub fn build_heatmap(
    date: NaiveDate,
    series: &[PriceSeries],
    mut failures: Vec<ZoneFailure>,
) -> Heatmap {
    let mut matrix = HeatmapMatrix::new();
    let mut spreads = Vec::with_capacity(series.len());

    for s in series {
        let row = align_hourly(s, date);
        if row.iter().all(Option::is_none) {
            warn!(zone = %s.zone, %date, "no prices fall on the requested day");
            failures.push(ZoneFailure {
                zone: s.zone.clone(),
                kind: FailureKind::NoData,
                message: format!("No data for {} on {}", s.zone, date),
            });
            continue;
        }
        spreads.push(zone_spread(&s.zone, &row));
        matrix.push_row(s.zone.clone(), row);
    }

    let currency = series.iter().find_map(|s| s.currency.as_deref());
    let unit = series.iter().find_map(|s| s.unit.as_deref());

    Heatmap {
        date,
        matrix,
        spreads,
        failures,
        currency: display_currency(currency),
        unit: display_unit(unit),
    }
}

fn display_currency(code: Option<&str>) -> String {
    match code {
        None | Some("EUR") => "€".to_string(),
        Some(other) => other.to_string(),
    }
}

fn display_unit(code: Option<&str>) -> String {
    match code {
        None | Some("MWH") => "MWh".to_string(),
        Some(other) => other.to_string(),
    }
}
