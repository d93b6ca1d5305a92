//! Factual accuracy check: cross-reference with the knowledge store
//!
//! The knowledge store's answer to the same question is the reference.
//! Score = |reference words ∩ answer words| / |reference words| + 0.2, capped
//! at 1.0. Any lookup failure or missing reference yields 0.6.

use async_trait::async_trait;
use rqa_common::text::whitespace_set;
use rqa_common::KnowledgeStoreClient;
use std::time::Duration;
use tracing::{debug, warn};

use super::CheckResult;

/// Upper bound on the reference lookup
pub const REFERENCE_TIMEOUT: Duration = Duration::from_secs(3);

/// Score when no reference could be obtained
pub const UNVERIFIED_SCORE: f64 = 0.6;

/// Bonus for having been cross-referenced at all
pub const REFERENCE_BOOST: f64 = 0.2;

/// Provider of reference answers
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Reference answer for `question`, `Ok(None)` when nothing matched
    async fn reference_answer(&self, question: &str) -> rqa_common::Result<Option<String>>;
}

#[async_trait]
impl ReferenceSource for KnowledgeStoreClient {
    async fn reference_answer(&self, question: &str) -> rqa_common::Result<Option<String>> {
        let result = self.search(question).await?;
        Ok(result.found.then_some(result.answer))
    }
}

/// Word overlap of `answer` with `reference`, relative to the reference vocabulary
pub fn reference_overlap(reference: &str, answer: &str) -> f64 {
    let reference_lower = reference.to_lowercase();
    let answer_lower = answer.to_lowercase();

    let reference_words = whitespace_set(&reference_lower);
    let answer_words = whitespace_set(&answer_lower);

    let common = reference_words.intersection(&answer_words).count();
    common as f64 / reference_words.len().max(1) as f64
}

pub async fn check_factual_accuracy(
    source: &dyn ReferenceSource,
    question: &str,
    answer: &str,
) -> CheckResult {
    match source.reference_answer(question).await {
        Ok(Some(reference)) => {
            let similarity = reference_overlap(&reference, answer);
            debug!(similarity, "Factual accuracy (cross-referenced)");
            Ok((similarity + REFERENCE_BOOST).min(1.0))
        }
        Ok(None) => {
            debug!("No reference answer found");
            Ok(UNVERIFIED_SCORE)
        }
        Err(e) => {
            warn!(error = %e, "Reference lookup failed");
            Ok(UNVERIFIED_SCORE)
        }
    }
}
