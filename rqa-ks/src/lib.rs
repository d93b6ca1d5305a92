//! rqa-ks library - Knowledge Store Service
//!
//! Stores question/answer pairs with local embeddings in SQLite, answers
//! similarity lookups, and keeps a log of answered queries.

pub mod api;
pub mod db;
pub mod embedding;
pub mod error;
pub mod heuristics;
pub mod search;
pub mod topics;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use embedding::HashingEncoder;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Text encoder used for both stored entries and queries
    pub encoder: Arc<HashingEncoder>,
    /// Service startup timestamp
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, encoder: HashingEncoder) -> Self {
        Self {
            db,
            encoder: Arc::new(encoder),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::search_routes())
        .merge(api::knowledge_routes())
        .merge(api::interaction_routes())
        .merge(api::validate_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
