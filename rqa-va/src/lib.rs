//! rqa-va library - Validation Service
//!
//! Scores a candidate (question, answer) pair along seven quality
//! dimensions and returns a weighted pass/fail verdict with suggestions.

pub mod api;
pub mod error;
pub mod validators;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use validators::AnswerValidator;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Answer validator (stateless, shared)
    pub validator: Arc<AnswerValidator>,
    /// Whether a language model key is configured (reported by /health)
    pub llm_configured: bool,
    /// Service startup timestamp
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(validator: AnswerValidator, llm_configured: bool) -> Self {
        Self {
            validator: Arc::new(validator),
            llm_configured,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::validate_routes())
        .merge(api::metrics_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
