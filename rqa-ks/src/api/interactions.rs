//! Interaction logging endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::db::interactions::{insert_interaction, InteractionRecord};
use crate::{ApiResult, AppState};

/// POST /log_interaction body
#[derive(Debug, Deserialize)]
pub struct InteractionLog {
    pub query: String,
    pub answer: String,
    pub source: String,
    pub confidence: f64,
    pub timestamp: String,
    /// Measured by the caller when it has a figure
    #[serde(default)]
    pub processing_time_ms: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogInteractionResponse {
    pub status: String,
    pub log_id: Uuid,
}

/// POST /log_interaction
pub async fn log_interaction(
    State(state): State<AppState>,
    Json(log): Json<InteractionLog>,
) -> ApiResult<Json<LogInteractionResponse>> {
    let record = InteractionRecord {
        id: Uuid::new_v4(),
        query: log.query,
        answer: log.answer,
        source: log.source,
        confidence: log.confidence,
        timestamp: log.timestamp,
        processing_time_ms: log.processing_time_ms,
    };

    insert_interaction(&state.db, &record).await?;
    info!(log_id = %record.id, source = %record.source, "Logged interaction");

    Ok(Json(LogInteractionResponse {
        status: "success".to_string(),
        log_id: record.id,
    }))
}

pub fn interaction_routes() -> Router<AppState> {
    Router::new().route("/log_interaction", post(log_interaction))
}
