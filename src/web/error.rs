use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::error::HeatmapError;

/// Error rendered as a JSON `{"error": "..."}` body.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<HeatmapError> for AppError {
    fn from(e: HeatmapError) -> Self {
        let status = match e {
            HeatmapError::EmptySelection
            | HeatmapError::UnknownZone(_)
            | HeatmapError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            HeatmapError::NoData(_) => StatusCode::NOT_FOUND,
            HeatmapError::Unauthorized(_)
            | HeatmapError::Api { .. }
            | HeatmapError::Http(_)
            | HeatmapError::Xml(_) => StatusCode::BAD_GATEWAY,
            HeatmapError::RateLimited(_) => StatusCode::SERVICE_UNAVAILABLE,
            HeatmapError::Json(_) | HeatmapError::Config(_) | HeatmapError::Task(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}
