//! Answer validation endpoint

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use rqa_common::api::AnswerSource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::validators::QualityMetrics;
use crate::{ApiError, ApiResult, AppState};

/// POST /validate_answer body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationRequest {
    pub question: String,
    pub answer: String,
    pub source: AnswerSource,
    /// Producer's own confidence, in [0, 1]
    pub confidence: f64,
    #[serde(default)]
    pub context: Map<String, Value>,
}

impl ValidationRequest {
    /// Decode and check a raw request body
    pub fn from_body(body: &[u8]) -> ApiResult<Self> {
        let request: Self =
            serde_json::from_slice(body).map_err(|e| ApiError::Validation(e.to_string()))?;

        if !(0.0..=1.0).contains(&request.confidence) {
            return Err(ApiError::Validation(format!(
                "confidence must be within [0, 1], got {}",
                request.confidence
            )));
        }
        Ok(request)
    }
}

/// POST /validate_answer response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub is_valid: bool,
    pub validation_score: f64,
    pub validation_reason: String,
    pub quality_metrics: QualityMetrics,
    pub suggestions: Vec<String>,
    pub final_answer: String,
}

/// POST /validate_answer
///
/// The body is decoded by hand so that malformed input is reported the same
/// way as every other endpoint failure.
pub async fn validate_answer(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<ValidationResponse>> {
    let request = ValidationRequest::from_body(&body)?;

    info!(
        question = %request.question,
        source = request.source.as_str(),
        confidence = request.confidence,
        "Validating answer"
    );

    let verdict = state
        .validator
        .validate(&request.question, &request.answer, request.source)
        .await;

    Ok(Json(ValidationResponse {
        is_valid: verdict.is_valid,
        validation_score: verdict.score,
        validation_reason: verdict.reason,
        quality_metrics: verdict.metrics,
        suggestions: verdict.suggestions,
        final_answer: request.answer,
    }))
}

pub fn validate_routes() -> Router<AppState> {
    Router::new().route("/validate_answer", post(validate_answer))
}
