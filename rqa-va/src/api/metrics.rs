//! Validation metrics description endpoint
//!
//! Static: weights, thresholds, accepted sources and criterion descriptions.

use axum::{routing::get, Json, Router};
use rqa_common::api::AnswerSource;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::validators::{Criterion, HIGH_QUALITY_THRESHOLD, MIN_VALIDATION_SCORE};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct Thresholds {
    pub minimum_validation_score: f64,
    pub high_quality_threshold: f64,
}

#[derive(Debug, Serialize)]
pub struct ValidationMetricsResponse {
    /// Keyed by the `quality_metrics` field names
    pub validation_weights: BTreeMap<&'static str, f64>,
    pub thresholds: Thresholds,
    pub supported_sources: Vec<AnswerSource>,
    /// Keyed by criterion name
    pub quality_criteria: BTreeMap<&'static str, &'static str>,
}

/// GET /validation_metrics
pub async fn validation_metrics() -> Json<ValidationMetricsResponse> {
    Json(ValidationMetricsResponse {
        validation_weights: Criterion::ALL
            .iter()
            .map(|c| (c.metric_key(), c.weight()))
            .collect(),
        thresholds: Thresholds {
            minimum_validation_score: MIN_VALIDATION_SCORE,
            high_quality_threshold: HIGH_QUALITY_THRESHOLD,
        },
        supported_sources: AnswerSource::ALL.to_vec(),
        quality_criteria: Criterion::ALL
            .iter()
            .map(|c| (c.name(), c.description()))
            .collect(),
    })
}

pub fn metrics_routes() -> Router<AppState> {
    Router::new().route("/validation_metrics", get(validation_metrics))
}
