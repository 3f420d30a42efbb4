//! Day-ahead price fetching for a delivery day across several zones.

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::client::PriceSource;
use crate::error::{HeatmapError, Result};
use crate::models::{FailureKind, PriceSeries, ZoneFailure};
use crate::zones::BiddingZone;

// ---------------------------------------------------------------------------
// FetchOutcome
// ---------------------------------------------------------------------------

/// Successful series (selection order) plus the zones that produced nothing.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub series: Vec<PriceSeries>,
    pub failures: Vec<ZoneFailure>,
}

// ---------------------------------------------------------------------------
// PriceQuery
// ---------------------------------------------------------------------------

/// Query interface for day-ahead prices, borrowing a [`PriceSource`].
pub struct PriceQuery<'a> {
    source: &'a dyn PriceSource,
}

impl<'a> PriceQuery<'a> {
    pub fn new(source: &'a dyn PriceSource) -> Self {
        Self { source }
    }

    /// Fetch one zone's prices for `[date 00:00, date+1 00:00)` in the zone's local time.
    pub fn fetch_day(&self, zone: &BiddingZone, date: NaiveDate) -> Result<PriceSeries> {
        let (start, end) = day_window(zone.tz, date)?;
        self.source.day_ahead_prices(zone, start, end)
    }

    /// Fetch every zone in `codes`, one after another.
    ///
    /// Zones that fail or come back empty are recorded in
    /// [`FetchOutcome::failures`] and the remaining zones are still fetched.
    /// After a credential or rate-limit error the provider is not called
    /// again: that zone and every later one are recorded as failures, and
    /// the rows fetched so far are kept. Duplicate codes are fetched once.
    pub fn fetch_all<S: AsRef<str>>(&self, date: NaiveDate, codes: &[S]) -> Result<FetchOutcome> {
        if codes.is_empty() {
            return Err(HeatmapError::EmptySelection);
        }

        let mut outcome = FetchOutcome::default();
        let mut seen: Vec<String> = Vec::with_capacity(codes.len());
        let mut halted: Option<HeatmapError> = None;

        for code in codes {
            let code = code.as_ref().trim();
            let zone = match BiddingZone::lookup(code) {
                Ok(zone) => zone,
                Err(e) => {
                    warn!(zone = code, "skipping unknown bidding zone");
                    outcome.failures.push(failure(code, FailureKind::Error, &e));
                    continue;
                }
            };
            if seen.iter().any(|c| c == zone.code) {
                continue;
            }
            seen.push(zone.code.to_string());

            if let Some(cause) = &halted {
                outcome.failures.push(ZoneFailure {
                    zone: zone.code.to_string(),
                    kind: FailureKind::Error,
                    message: format!("Not fetched after an earlier error: {cause}"),
                });
                continue;
            }

            match self.fetch_day(zone, date) {
                Ok(series) if series.is_empty() => {
                    warn!(zone = zone.code, %date, "provider returned an empty series");
                    outcome.failures.push(ZoneFailure {
                        zone: zone.code.to_string(),
                        kind: FailureKind::NoData,
                        message: format!("No data for {} on {}", zone.code, date),
                    });
                }
                Ok(series) => {
                    info!(zone = zone.code, %date, points = series.points.len(), "fetched day-ahead prices");
                    outcome.series.push(series);
                }
                Err(e) if e.is_fatal() => {
                    warn!(zone = zone.code, error = %e, "provider refused the request, skipping remaining zones");
                    outcome.failures.push(failure(zone.code, FailureKind::Error, &e));
                    halted = Some(e);
                }
                Err(e) => {
                    warn!(zone = zone.code, %date, error = %e, "failed to fetch day-ahead prices");
                    let kind = match e {
                        HeatmapError::NoData(_) => FailureKind::NoData,
                        _ => FailureKind::Error,
                    };
                    outcome.failures.push(failure(zone.code, kind, &e));
                }
            }
        }

        Ok(outcome)
    }
}

fn failure(zone: &str, kind: FailureKind, err: &HeatmapError) -> ZoneFailure {
    ZoneFailure {
        zone: zone.to_string(),
        kind,
        message: err.to_string(),
    }
}

/// Local-midnight bounds of `date` in `tz`.
///
/// The window is 23 or 25 hours long on DST-transition days.
pub fn day_window(tz: Tz, date: NaiveDate) -> Result<(DateTime<Tz>, DateTime<Tz>)> {
    let next = date
        .succ_opt()
        .ok_or_else(|| HeatmapError::InvalidArgument(format!("Date out of range: {date}")))?;
    Ok((local_midnight(tz, date)?, local_midnight(tz, next)?))
}

fn local_midnight(tz: Tz, date: NaiveDate) -> Result<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(chrono::NaiveTime::MIN))
        .earliest()
        .ok_or_else(|| {
            HeatmapError::InvalidArgument(format!("Midnight does not exist on {date} in {tz}"))
        })
}
