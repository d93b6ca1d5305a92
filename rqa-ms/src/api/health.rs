//! Health and status endpoints

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub llm_configured: bool,
    pub ai_memory_enabled: bool,
    pub knowledge_store_url: String,
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
        service: "rqa-ms".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        llm_configured: state.engine.llm_configured(),
        ai_memory_enabled: state.engine.ai_memory_enabled(),
        knowledge_store_url: state.status_probe.base_url().to_string(),
        uptime_seconds,
        timestamp: now.to_rfc3339(),
    })
}

/// Knowledge store reachability as seen from this service
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeStoreStatus {
    /// `/health` answered with a success status
    Connected,
    /// `/health` answered with a failure status
    Error,
    /// No answer (refused, timed out)
    Disconnected,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub memory_service: String,
    pub language_model: String,
    pub knowledge_store: KnowledgeStoreStatus,
    pub ai_memory: String,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// GET /status
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let knowledge_store = match state.status_probe.health().await {
        Ok(true) => KnowledgeStoreStatus::Connected,
        Ok(false) => KnowledgeStoreStatus::Error,
        Err(e) => {
            debug!(error = %e, "Knowledge store probe failed");
            KnowledgeStoreStatus::Disconnected
        }
    };

    let endpoints = BTreeMap::from([
        ("memory_query", "/memory_query"),
        ("memory_query_get", "/memory_query_get"),
        ("legacy_query", "/query"),
        ("health", "/health"),
        ("status", "/status"),
    ]);

    Json(StatusResponse {
        memory_service: "active".to_string(),
        language_model: if state.engine.llm_configured() {
            "configured"
        } else {
            "not_configured"
        }
        .to_string(),
        knowledge_store,
        ai_memory: if state.engine.ai_memory_enabled() {
            "active"
        } else {
            "disabled"
        }
        .to_string(),
        endpoints,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(status))
}
