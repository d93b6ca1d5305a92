//! Knowledge search endpoints

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use rqa_common::api::KnowledgeMatch;
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;
use tracing::info;

use crate::search::{topic_then_vector_search, vector_search};
use crate::{ApiResult, AppState};

/// Body of `POST /manual_search`, query of `GET /manual_search_get`
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub question: String,
}

/// POST /manual_search
pub async fn manual_search(
    State(state): State<AppState>,
    Json(query): Json<SearchQuery>,
) -> ApiResult<Json<KnowledgeMatch>> {
    let result = vector_search(&state.db, &state.encoder, &query.question).await?;

    info!(
        question = %query.question,
        found = result.found,
        confidence = result.confidence,
        "Vector search"
    );
    Ok(Json(result))
}

/// GET /manual_search_get?question=...
pub async fn manual_search_get(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<KnowledgeMatch>> {
    let started = Instant::now();
    let mut result = topic_then_vector_search(&state.db, &state.encoder, &query.question).await?;

    let processing_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    result
        .metadata
        .insert("processing_time_ms".to_string(), json!(processing_time_ms));

    info!(
        question = %query.question,
        found = result.found,
        confidence = result.confidence,
        "Knowledge search"
    );
    Ok(Json(result))
}

pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/manual_search", post(manual_search))
        .route("/manual_search_get", get(manual_search_get))
}
