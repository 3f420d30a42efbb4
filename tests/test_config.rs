//! Settings loading and zone table tests.

use std::io::Write;

use dayahead_heatmap::config::{self, Settings};
use dayahead_heatmap::{BiddingZone, HeatmapError};
use tempfile::Builder;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[test]
fn defaults_match_the_dashboard() {
    let settings = Settings::default();
    assert_eq!(settings.api_base, config::API_BASE);
    assert_eq!(settings.port, 8501);
    assert_eq!(settings.cache_ttl_secs, 3600);
    assert_eq!(settings.default_zones, vec!["CZ", "DE_LU", "FR", "SK", "PL", "AT"]);
    assert_eq!(settings.bind_addr(), "0.0.0.0:8501");
}

#[test]
fn toml_file_overrides_defaults() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
entsoe_token = "from-file"
port = 9000
cache_ttl_secs = 60
default_zones = ["NL", "BE"]
"#
    )
    .unwrap();
    file.flush().unwrap();

    let settings = Settings::load_from(Some(file.path())).unwrap();
    assert_eq!(settings.entsoe_token.as_deref(), Some("from-file"));
    assert_eq!(settings.port, 9000);
    assert_eq!(settings.cache_ttl_secs, 60);
    assert_eq!(settings.default_zones, vec!["NL", "BE"]);
    assert_eq!(settings.api_base, config::API_BASE);
}

#[test]
fn missing_explicit_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Settings::load_from(Some(dir.path().join("absent.toml").as_path()));
    assert!(matches!(result, Err(HeatmapError::Config(_))));
}

// ---------------------------------------------------------------------------
// BiddingZone
// ---------------------------------------------------------------------------

#[test]
fn lookup_is_case_insensitive_and_accepts_dashes() {
    assert_eq!(BiddingZone::lookup("de_lu").unwrap().code, "DE_LU");
    assert_eq!(BiddingZone::lookup("DE-LU").unwrap().eic, "10Y1001A1001A82H");
    assert_eq!(BiddingZone::lookup(" cz ").unwrap().tz, chrono_tz::Europe::Prague);
}

#[test]
fn lookup_rejects_unknown_codes() {
    match BiddingZone::lookup("XX") {
        Err(HeatmapError::UnknownZone(code)) => assert_eq!(code, "XX"),
        other => panic!("expected UnknownZone, got {other:?}"),
    }
}

#[test]
fn zone_table_has_unique_codes_and_includes_defaults() {
    let zones = BiddingZone::all();
    for (i, a) in zones.iter().enumerate() {
        assert!(zones[i + 1..].iter().all(|b| b.code != a.code), "duplicate {}", a.code);
    }
    for code in config::default_zones() {
        assert!(BiddingZone::lookup(&code).is_ok(), "default zone {code} missing");
    }
}
