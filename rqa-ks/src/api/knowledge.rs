//! Knowledge insertion endpoint (feedback loop)

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::db::entries::{insert_entry, KnowledgeEntry, DEFAULT_ENTRY_CONFIDENCE, DEFAULT_ENTRY_SOURCE};
use crate::{ApiError, ApiResult, AppState};

/// POST /add_manual_knowledge body
#[derive(Debug, Deserialize)]
pub struct AddKnowledgeRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    pub confidence_score: Option<f64>,
    pub source_type: Option<String>,
    pub brand: Option<String>,
    pub product_category: Option<String>,
    /// Free-form; stored as JSON text
    pub tags: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddKnowledgeResponse {
    pub status: String,
    pub entry_id: Uuid,
}

/// POST /add_manual_knowledge
pub async fn add_manual_knowledge(
    State(state): State<AppState>,
    Json(request): Json<AddKnowledgeRequest>,
) -> ApiResult<Json<AddKnowledgeResponse>> {
    if request.question.trim().is_empty() || request.answer.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Question and answer are required".to_string(),
        ));
    }

    let mut entry = KnowledgeEntry::new(request.question, request.answer, &state.encoder);
    entry.confidence_score = request
        .confidence_score
        .unwrap_or(DEFAULT_ENTRY_CONFIDENCE)
        .clamp(0.0, 1.0);
    entry.source_type = request
        .source_type
        .unwrap_or_else(|| DEFAULT_ENTRY_SOURCE.to_string());
    entry.brand = request.brand.unwrap_or_default();
    entry.product_category = request.product_category.unwrap_or_default();
    entry.tags = request
        .tags
        .unwrap_or_else(|| Value::Array(Vec::new()))
        .to_string();

    insert_entry(&state.db, &entry).await?;
    info!(entry_id = %entry.id, source_type = %entry.source_type, "Added knowledge entry");

    Ok(Json(AddKnowledgeResponse {
        status: "success".to_string(),
        entry_id: entry.id,
    }))
}

pub fn knowledge_routes() -> Router<AppState> {
    Router::new().route("/add_manual_knowledge", post(add_manual_knowledge))
}
