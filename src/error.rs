#[derive(Debug, thiserror::Error)]
pub enum HeatmapError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("ENTSO-E API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("ENTSO-E API rejected the security token: {0}")]
    Unauthorized(String),

    #[error("ENTSO-E API rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Unknown bidding zone: {0}")]
    UnknownZone(String),

    #[error("Select at least one bidding zone")]
    EmptySelection,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Task error: {0}")]
    Task(String),
}

impl HeatmapError {
    /// Whether this error stops the remaining zone fetches of a request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::RateLimited(_))
    }
}

pub type Result<T> = std::result::Result<T, HeatmapError>;
