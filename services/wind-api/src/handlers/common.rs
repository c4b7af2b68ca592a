//! Shared handler utilities: the JSON error envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use wind_common::WindError;

/// Wrapper turning a `WindError` into the client-facing JSON error body
/// `{"error": "..."}` with the taxonomy's HTTP status.
#[derive(Debug)]
pub struct ApiError(pub WindError);

impl From<WindError> for ApiError {
    fn from(err: WindError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
