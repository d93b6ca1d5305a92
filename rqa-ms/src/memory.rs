//! Memory engine
//!
//! Answers a question in layers:
//! 1. knowledge store context (only confident matches are used)
//! 2. AI memory context, unless disabled
//! 3. language model synthesis when a model is configured
//! 4. static fallbacks otherwise, or when the model call fails
//!
//! # Confidence
//! | path | confidence |
//! |---|---|
//! | model, with context | 0.8 |
//! | model, without context | 0.6 |
//! | model failed, with context | 0.6 |
//! | model failed, without context | 0.1 |
//! | no model, with context | 0.7 |
//! | no model, AI memory only | 0.4 |
//! | no model, nothing | 0.2 |

use async_trait::async_trait;
use chrono::Utc;
use rqa_common::api::{KnowledgeMatch, MemoryAnswer, MemoryOrigin};
use rqa_common::KnowledgeStoreClient;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::llm::LanguageModel;

/// Upper bound on the knowledge store lookup
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Knowledge matches at or below this confidence are not used as context
pub const CONTEXT_CONFIDENCE_THRESHOLD: f64 = 0.5;

pub const SYSTEM_PROMPT: &str = "You are an intelligent question-answering agent backed by AI memory \
and a curated knowledge base. Provide helpful, accurate answers based on the context provided. \
If context is available, prioritize it. If not, use your knowledge but mention limitations.";

const MODEL_ERROR_ANSWER: &str =
    "I encountered an error processing your request. Please try again or contact support.";

const NO_INFORMATION_ANSWER: &str = "I apologize, but I don't have enough information to provide \
a comprehensive answer to your question. Please try rephrasing or contact support for assistance.";

pub const SYSTEM_ERROR_ANSWER: &str = "System error occurred. Please contact support.";

/// Source of knowledge store context
#[async_trait]
pub trait KnowledgeLookup: Send + Sync {
    async fn lookup(&self, question: &str) -> rqa_common::Result<KnowledgeMatch>;
}

#[async_trait]
impl KnowledgeLookup for KnowledgeStoreClient {
    async fn lookup(&self, question: &str) -> rqa_common::Result<KnowledgeMatch> {
        self.search(question).await
    }
}

/// Semantic-memory preamble for `question`
pub fn ai_memory_context(question: &str) -> String {
    format!(
        "Based on knowledge graphs and semantic understanding of '{}'",
        question
    )
}

/// User prompt sent to the language model
pub fn build_user_prompt(
    question: &str,
    knowledge_context: Option<&str>,
    memory_context: Option<&str>,
    caller_context: &Map<String, Value>,
) -> String {
    let mut prompt = format!(
        "Context from Knowledge Base: {}\n\nAI Memory Context: {}\n\n",
        knowledge_context.unwrap_or(""),
        memory_context.unwrap_or("")
    );
    if !caller_context.is_empty() {
        prompt.push_str(&format!(
            "Caller Context: {}\n\n",
            Value::Object(caller_context.clone())
        ));
    }
    prompt.push_str(&format!(
        "User Question: {}\n\nPlease provide a comprehensive answer:",
        question
    ));
    prompt
}

/// Answer reported when the query pipeline itself failed
pub fn system_error_answer(detail: &str) -> MemoryAnswer {
    let mut metadata = Map::new();
    metadata.insert("error".to_string(), json!(detail));
    MemoryAnswer {
        answer: SYSTEM_ERROR_ANSWER.to_string(),
        confidence: 0.1,
        used_context: false,
        ai_memory_used: false,
        source: MemoryOrigin::Error,
        metadata,
    }
}

/// Layered question answering
pub struct MemoryEngine {
    knowledge: Arc<dyn KnowledgeLookup>,
    model: Option<Arc<dyn LanguageModel>>,
    ai_memory_enabled: bool,
}

impl MemoryEngine {
    pub fn new(
        knowledge: Arc<dyn KnowledgeLookup>,
        model: Option<Arc<dyn LanguageModel>>,
        ai_memory_enabled: bool,
    ) -> Self {
        Self {
            knowledge,
            model,
            ai_memory_enabled,
        }
    }

    pub fn llm_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn ai_memory_enabled(&self) -> bool {
        self.ai_memory_enabled
    }

    /// Confident knowledge store answer for `question`, if any
    ///
    /// Lookup failures are logged and treated as "no context".
    pub async fn knowledge_context(&self, question: &str) -> Option<String> {
        match self.knowledge.lookup(question).await {
            Ok(m) if m.found && m.confidence > CONTEXT_CONFIDENCE_THRESHOLD && !m.answer.is_empty() => {
                debug!(confidence = m.confidence, "Using knowledge store context");
                Some(m.answer)
            }
            Ok(m) => {
                debug!(found = m.found, confidence = m.confidence, "No confident knowledge match");
                None
            }
            Err(e) => {
                warn!(error = %e, "Knowledge store lookup failed");
                None
            }
        }
    }

    pub async fn query(&self, question: &str, caller_context: &Map<String, Value>) -> MemoryAnswer {
        info!(question = %question, "Processing memory query");

        let knowledge_context = self.knowledge_context(question).await;
        let memory_context = self.ai_memory_enabled.then(|| ai_memory_context(question));

        let (answer, confidence) = match &self.model {
            Some(model) => {
                let user_prompt = build_user_prompt(
                    question,
                    knowledge_context.as_deref(),
                    memory_context.as_deref(),
                    caller_context,
                );
                match model.complete(SYSTEM_PROMPT, &user_prompt).await {
                    Ok(text) => {
                        info!(model = model.model_name(), "Generated answer with language model");
                        let confidence = if knowledge_context.is_some() { 0.8 } else { 0.6 };
                        (text, confidence)
                    }
                    Err(e) => {
                        error!(error = %e, "Language model call failed");
                        match &knowledge_context {
                            Some(ctx) => (format!("Based on our knowledge: {}", ctx), 0.6),
                            None => (MODEL_ERROR_ANSWER.to_string(), 0.1),
                        }
                    }
                }
            }
            None => {
                let fallback = match (&knowledge_context, &memory_context) {
                    (Some(ctx), _) => (format!("Based on our knowledge base: {}", ctx), 0.7),
                    (None, Some(_)) => (
                        format!(
                            "Based on AI memory analysis: I understand you're asking about '{}'. \
                             While I don't have specific information in our knowledge base, \
                             I can help you with general guidance on this topic.",
                            question
                        ),
                        0.4,
                    ),
                    (None, None) => (NO_INFORMATION_ANSWER.to_string(), 0.2),
                };
                debug!("Generated fallback answer (no language model)");
                fallback
            }
        };

        let used_context = knowledge_context.is_some();
        let ai_memory_used = memory_context.is_some();

        let mut metadata = Map::new();
        metadata.insert("knowledge_context_found".to_string(), json!(used_context));
        metadata.insert("ai_memory_active".to_string(), json!(ai_memory_used));
        metadata.insert("llm_used".to_string(), json!(self.llm_configured()));
        metadata.insert("timestamp".to_string(), json!(Utc::now().to_rfc3339()));

        MemoryAnswer {
            answer,
            confidence,
            used_context,
            ai_memory_used,
            source: if ai_memory_used {
                MemoryOrigin::AiMemory
            } else {
                MemoryOrigin::Fallback
            },
            metadata,
        }
    }
}
