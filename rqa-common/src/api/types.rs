//! Shared API request/response types
//!
//! # Architecture
//!
//! These types cross service boundaries:
//! - rqa-ks (Knowledge Store) produces [`KnowledgeMatch`]
//! - rqa-ms (Memory/Synthesis) consumes [`KnowledgeMatch`], produces [`MemoryAnswer`]
//! - rqa-va (Validation) consumes [`KnowledgeMatch`] and [`AnswerSource`]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ========================================
// Knowledge Store Types
// ========================================

/// Result of a knowledge store search
///
/// Every field has a default so that partial bodies (`{"found": false}`)
/// still deserialize.
///
/// # Examples
///
/// ```
/// use rqa_common::api::KnowledgeMatch;
///
/// let m: KnowledgeMatch = serde_json::from_str(r#"{"found": true, "answer": "Yes"}"#).unwrap();
/// assert!(m.found);
/// assert_eq!(m.answer, "Yes");
/// assert_eq!(m.confidence, 0.0);
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct KnowledgeMatch {
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub source_type: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl KnowledgeMatch {
    /// A "not found" result carrying a reason
    pub fn not_found(source_type: &str, confidence: f64, reason: &str) -> Self {
        let mut metadata = Map::new();
        metadata.insert("reason".to_string(), Value::String(reason.to_string()));
        Self {
            found: false,
            answer: String::new(),
            confidence,
            source_type: source_type.to_string(),
            metadata,
        }
    }
}

// ========================================
// Validation Types
// ========================================

/// Which pipeline stage produced the answer under validation
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    KnowledgeStore,
    MemoryService,
    Combined,
}

impl AnswerSource {
    pub const ALL: [AnswerSource; 3] = [
        AnswerSource::KnowledgeStore,
        AnswerSource::MemoryService,
        AnswerSource::Combined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::KnowledgeStore => "knowledge_store",
            AnswerSource::MemoryService => "memory_service",
            AnswerSource::Combined => "combined",
        }
    }
}

// ========================================
// Memory Service Types
// ========================================

/// How the memory service produced its answer
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemoryOrigin {
    /// AI memory context took part in the answer
    AiMemory,
    /// Static fallback text
    Fallback,
    /// The query pipeline itself failed
    Error,
}

/// Answer returned by the memory service
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MemoryAnswer {
    pub answer: String,
    pub confidence: f64,
    pub used_context: bool,
    pub ai_memory_used: bool,
    pub source: MemoryOrigin,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}
