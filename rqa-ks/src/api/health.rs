//! Health and statistics endpoints

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::db::entries::{count_entries, entry_stats, EntryStats};
use crate::db::interactions::{count_interactions, interaction_stats, InteractionStats};
use crate::embedding::EMBEDDING_MODEL;
use crate::{ApiResult, AppState};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub knowledge_entries: i64,
    pub logged_interactions: i64,
    pub embedding_model: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
}

/// GET /health
///
/// Counts both tables, so a broken database surfaces as a 500.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let knowledge_entries = count_entries(&state.db).await?;
    let logged_interactions = count_interactions(&state.db).await?;

    let now = Utc::now();
    let uptime_seconds = now
        .signed_duration_since(state.startup_time)
        .num_seconds()
        .max(0) as u64;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        service: "rqa-ks".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        knowledge_entries,
        logged_interactions,
        embedding_model: EMBEDDING_MODEL.to_string(),
        uptime_seconds,
        timestamp: now.to_rfc3339(),
    }))
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub knowledge: EntryStats,
    pub interactions: InteractionStats,
}

/// GET /stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<StatsResponse>> {
    Ok(Json(StatsResponse {
        knowledge: entry_stats(&state.db).await?,
        interactions: interaction_stats(&state.db).await?,
    }))
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(stats))
}
