//! Shared test fixtures for the heatmap integration tests.
//!
//! Provides `StubSource`, a scripted `PriceSource` that records which zones
//! were fetched, and builders for ENTSO-E XML documents.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeDelta};
use chrono_tz::Tz;
use dayahead_heatmap::models::{PricePoint, PriceSeries};
use dayahead_heatmap::{BiddingZone, HeatmapError, PriceSource, Result};

// ---------------------------------------------------------------------------
// StubSource
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Reply {
    /// One price per hour from the window start; extra slots are left empty.
    Hourly(Vec<f64>),
    /// One price per quarter-hour from the window start.
    Quarterly(Vec<f64>),
    Empty,
    Fail(&'static str),
    Unauthorized,
    RateLimited,
}

pub struct StubSource {
    replies: HashMap<String, Reply>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with(mut self, zone: &str, reply: Reply) -> Self {
        self.replies.insert(zone.to_string(), reply);
        self
    }

    /// Handle to the fetched zone codes, usable after the source is moved.
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

impl PriceSource for StubSource {
    fn day_ahead_prices(
        &self,
        zone: &BiddingZone,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<PriceSeries> {
        self.calls.lock().unwrap().push(zone.code.to_string());

        let reply = self
            .replies
            .get(zone.code)
            .cloned()
            .unwrap_or(Reply::Fail("no stub reply"));

        let stepped = |step: TimeDelta, prices: &[f64]| {
            let slots = ((end - start).num_seconds() / step.num_seconds()) as usize;
            prices
                .iter()
                .take(slots)
                .enumerate()
                .map(|(i, &price)| PricePoint {
                    timestamp: start + step * i as i32,
                    price,
                })
                .collect::<Vec<_>>()
        };

        let points = match reply {
            Reply::Hourly(prices) => stepped(TimeDelta::hours(1), &prices),
            Reply::Quarterly(prices) => stepped(TimeDelta::minutes(15), &prices),
            Reply::Empty => Vec::new(),
            Reply::Fail(msg) => {
                return Err(HeatmapError::Api {
                    status: 503,
                    message: msg.to_string(),
                })
            }
            Reply::Unauthorized => return Err(HeatmapError::Unauthorized("invalid token".into())),
            Reply::RateLimited => return Err(HeatmapError::RateLimited("slow down".into())),
        };

        Ok(PriceSeries {
            zone: zone.code.to_string(),
            currency: Some("EUR".into()),
            unit: Some("MWH".into()),
            points,
        })
    }
}

// ---------------------------------------------------------------------------
// Price helpers
// ---------------------------------------------------------------------------

/// `n` prices rising from `base` in steps of `step`.
pub fn ramp(n: usize, base: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| base + step * i as f64).collect()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// ENTSO-E XML documents
// ---------------------------------------------------------------------------

pub struct PeriodXml<'a> {
    pub start: &'a str,
    pub end: &'a str,
    pub resolution: &'a str,
    pub points: Vec<(u32, f64)>,
}

/// Build a `Publication_MarketDocument` with one `TimeSeries` per entry.
pub fn publication_xml(series: &[(&str, Vec<PeriodXml<'_>>)]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="utf-8"?>
<Publication_MarketDocument xmlns="urn:iec62325.351:tc57wg16:451-3:publicationdocument:7:3">
  <mRID>bd3e8fbf3e1b4c8a9d6c</mRID>
  <revisionNumber>1</revisionNumber>
  <type>A44</type>
  <sender_MarketParticipant.mRID codingScheme="A01">10X1001A1001A450</sender_MarketParticipant.mRID>
  <createdDateTime>2024-03-14T12:00:00Z</createdDateTime>
"#,
    );
    for (i, (curve, periods)) in series.iter().enumerate() {
        xml.push_str(&format!(
            r#"  <TimeSeries>
    <mRID>{}</mRID>
    <businessType>A62</businessType>
    <in_Domain.mRID codingScheme="A01">10YCZ-CEPS-----N</in_Domain.mRID>
    <out_Domain.mRID codingScheme="A01">10YCZ-CEPS-----N</out_Domain.mRID>
    <currency_Unit.name>EUR</currency_Unit.name>
    <price_Measure_Unit.name>MWH</price_Measure_Unit.name>
    <curveType>{curve}</curveType>
"#,
            i + 1
        ));
        for period in periods {
            xml.push_str(&format!(
                r#"    <Period>
      <timeInterval>
        <start>{}</start>
        <end>{}</end>
      </timeInterval>
      <resolution>{}</resolution>
"#,
                period.start, period.end, period.resolution
            ));
            for (position, price) in &period.points {
                xml.push_str(&format!(
                    "      <Point>\n        <position>{position}</position>\n        <price.amount>{price}</price.amount>\n      </Point>\n"
                ));
            }
            xml.push_str("    </Period>\n");
        }
        xml.push_str("  </TimeSeries>\n");
    }
    xml.push_str("</Publication_MarketDocument>\n");
    xml
}

/// A full hourly day for 2024-03-15 CET (23:00Z to 23:00Z).
pub fn hourly_day_xml(prices: &[f64]) -> String {
    publication_xml(&[(
        "A01",
        vec![PeriodXml {
            start: "2024-03-14T23:00Z",
            end: "2024-03-15T23:00Z",
            resolution: "PT60M",
            points: prices
                .iter()
                .enumerate()
                .map(|(i, &p)| (i as u32 + 1, p))
                .collect(),
        }],
    )])
}

pub const ACK_NO_DATA_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Acknowledgement_MarketDocument xmlns="urn:iec62325.351:tc57wg16:451-1:acknowledgementdocument:7:0">
  <mRID>6a1c2b57-4c2e-4a4f-9d3c</mRID>
  <createdDateTime>2024-03-14T12:00:00Z</createdDateTime>
  <sender_MarketParticipant.mRID codingScheme="A01">10X1001A1001A450</sender_MarketParticipant.mRID>
  <Reason>
    <code>999</code>
    <text>No matching data found for Data item Day-ahead Prices [12.1.D] (10YAT-APG------L) and interval 2024-03-14T23:00Z/2024-03-15T23:00Z.</text>
  </Reason>
</Acknowledgement_MarketDocument>
"#;
