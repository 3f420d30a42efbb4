use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::Result;

pub const API_BASE: &str = "https://web-api.tp.entsoe.eu";

/// ENTSO-E document type for day-ahead prices.
pub const DOCUMENT_TYPE_DAY_AHEAD: &str = "A44";

/// Calendar used to decide which delivery days have been published.
pub const MARKET_TZ: Tz = chrono_tz::Europe::Brussels;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

pub fn default_zones() -> Vec<String> {
    ["CZ", "DE_LU", "FR", "SK", "PL", "AT"]
        .iter()
        .map(|z| z.to_string())
        .collect()
}

/// Per-user configuration directory, e.g. `~/.config/dayahead-heatmap` on Linux.
pub fn default_config_dir() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        dir.join("dayahead-heatmap")
    } else {
        PathBuf::from(".dayahead-heatmap")
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Runtime settings for the heatmap service.
///
/// Sources, later ones overriding earlier ones:
/// 1. `secrets.toml` in [`default_config_dir()`]
/// 2. `secrets.toml` / `heatmap.toml` in the working directory (or an explicit file)
/// 3. `HEATMAP_*` environment variables
///
/// The API token falls back to `ENTSOE_TOKEN` when none of the above set it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub entsoe_token: Option<String>,
    pub api_base: String,
    pub timeout_secs: u64,
    pub host: String,
    pub port: u16,
    pub cache_ttl_secs: u64,
    pub default_zones: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            entsoe_token: None,
            api_base: API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            host: "0.0.0.0".to_string(),
            port: 8501,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            default_zones: default_zones(),
        }
    }
}

impl Settings {
    /// Load settings from the standard locations.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings, reading `file` instead of the working-directory files when given.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder().add_source(
            config::File::from(default_config_dir().join("secrets.toml")).required(false),
        );

        builder = match file {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder
                .add_source(config::File::with_name("secrets").required(false))
                .add_source(config::File::with_name("heatmap").required(false)),
        };

        let settings: Settings = builder
            .add_source(
                config::Environment::with_prefix("HEATMAP")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("default_zones"),
            )
            .build()?
            .try_deserialize()?;

        Ok(settings.with_env_token())
    }

    fn with_env_token(mut self) -> Self {
        if self.entsoe_token.as_deref().map_or(true, str::is_empty) {
            self.entsoe_token = std::env::var("ENTSOE_TOKEN").ok().filter(|t| !t.is_empty());
        }
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
