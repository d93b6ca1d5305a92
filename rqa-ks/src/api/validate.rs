//! Basic answer validation endpoint

use axum::{routing::post, Json, Router};
use serde::Deserialize;
use tracing::debug;

use crate::heuristics::{basic_validation, BasicValidation};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BasicValidationRequest {
    pub question: String,
    pub answer: String,
    pub source: String,
}

/// POST /validate_answer
pub async fn validate_answer(Json(request): Json<BasicValidationRequest>) -> Json<BasicValidation> {
    let result = basic_validation(&request.question, &request.answer, &request.source);
    debug!(?result, "Basic validation");
    Json(result)
}

pub fn validate_routes() -> Router<AppState> {
    Router::new().route("/validate_answer", post(validate_answer))
}
