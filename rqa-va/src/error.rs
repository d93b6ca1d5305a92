//! Error types for rqa-va
//!
//! Scoring never fails; only request decoding can. Every endpoint-level
//! failure is reported as a 500 carrying the underlying message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be validated (malformed body, out-of-range field)
    #[error("Validation error: {0}")]
    Validation(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_code = match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
        };
        let message = self.to_string();
        error!("{}", message);

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
