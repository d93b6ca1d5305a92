//! Memory query endpoints

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use rqa_common::api::MemoryAnswer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

use crate::memory::system_error_answer;
use crate::{ApiError, ApiResult, AppState};

/// POST /memory_query and POST /query body
#[derive(Debug, Deserialize)]
pub struct MemoryQueryRequest {
    pub question: String,
    #[serde(default)]
    pub context: Map<String, Value>,
}

/// GET /memory_query_get query string
#[derive(Debug, Deserialize)]
pub struct MemoryQueryParams {
    pub question: String,
}

/// POST /query response (legacy shape)
#[derive(Debug, Serialize, Deserialize)]
pub struct LegacyQueryResponse {
    pub answer: String,
    pub used_context: bool,
}

/// Run the engine on its own task; a panic becomes the system error answer
async fn run_query(
    state: &AppState,
    question: String,
    context: Map<String, Value>,
) -> ApiResult<MemoryAnswer> {
    if question.trim().is_empty() {
        return Err(ApiError::BadRequest("question must not be empty".to_string()));
    }

    let engine = Arc::clone(&state.engine);
    let answer = tokio::spawn(async move { engine.query(&question, &context).await })
        .await
        .unwrap_or_else(|e| system_error_answer(&e.to_string()));

    info!(
        source = ?answer.source,
        confidence = answer.confidence,
        used_context = answer.used_context,
        "Memory query answered"
    );
    Ok(answer)
}

/// POST /memory_query
pub async fn memory_query(
    State(state): State<AppState>,
    Json(request): Json<MemoryQueryRequest>,
) -> ApiResult<Json<MemoryAnswer>> {
    run_query(&state, request.question, request.context)
        .await
        .map(Json)
}

/// GET /memory_query_get?question=...
pub async fn memory_query_get(
    State(state): State<AppState>,
    Query(params): Query<MemoryQueryParams>,
) -> ApiResult<Json<MemoryAnswer>> {
    run_query(&state, params.question, Map::new()).await.map(Json)
}

/// POST /query
pub async fn legacy_query(
    State(state): State<AppState>,
    Json(request): Json<MemoryQueryRequest>,
) -> ApiResult<Json<LegacyQueryResponse>> {
    let answer = run_query(&state, request.question, request.context).await?;
    Ok(Json(LegacyQueryResponse {
        answer: answer.answer,
        used_context: answer.used_context,
    }))
}

pub fn query_routes() -> Router<AppState> {
    Router::new()
        .route("/memory_query", post(memory_query))
        .route("/memory_query_get", get(memory_query_get))
        .route("/query", post(legacy_query))
}
