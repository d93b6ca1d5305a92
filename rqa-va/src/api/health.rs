//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::validators::Criterion;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Whether a language model API key is configured
    pub llm_configured: bool,
    /// Names of the scored criteria, in reporting order
    pub validation_criteria: Vec<&'static str>,
    /// Seconds since service started
    pub uptime_seconds: u64,
    pub timestamp: String,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let now = Utc::now();
    let uptime_seconds = now
        .signed_duration_since(state.startup_time)
        .num_seconds()
        .max(0) as u64;

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "rqa-va".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        llm_configured: state.llm_configured,
        validation_criteria: Criterion::ALL.iter().map(Criterion::name).collect(),
        uptime_seconds,
        timestamp: now.to_rfc3339(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
