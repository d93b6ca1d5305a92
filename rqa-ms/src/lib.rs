//! rqa-ms library - Memory/Synthesis Service
//!
//! Answers questions using knowledge store context, an AI memory preamble
//! and (when configured) a hosted language model, with static fallbacks.

pub mod api;
pub mod error;
pub mod llm;
pub mod memory;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use memory::MemoryEngine;
use rqa_common::KnowledgeStoreClient;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MemoryEngine>,
    /// Short-timeout client used only by `/status` to probe the knowledge store
    pub status_probe: KnowledgeStoreClient,
    /// Service startup timestamp
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(engine: MemoryEngine, status_probe: KnowledgeStoreClient) -> Self {
        Self {
            engine: Arc::new(engine),
            status_probe,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::query_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
