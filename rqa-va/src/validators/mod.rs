//! Answer quality validators
//!
//! Seven independent checks score a (question, answer) pair; the
//! [`AnswerValidator`] settles each check, weights the scores and derives
//! the verdict.
//!
//! # Checks (in reporting order)
//! 1. **relevance** - question key terms found in the answer
//! 2. **accuracy** - expected terms for the question's topic
//! 3. **completeness** - required aspects for the question's topic
//! 4. **clarity** - average sentence length
//! 5. **consistency** - contradictory term pairs
//! 6. **factual_accuracy** - overlap with the knowledge store's reference answer
//! 7. **logical_coherence** - logical connectives
//!
//! # Failure handling
//! Checks return [`CheckResult`]. A failed check never fails validation:
//! [`settle`] logs it and substitutes [`NEUTRAL_SCORE`].

pub mod answer_validator;
pub mod clarity;
pub mod coherence;
pub mod consistency;
pub mod factual;
pub mod relevance;
pub mod topics;

pub use answer_validator::{AnswerValidator, Verdict};
pub use factual::ReferenceSource;
pub use topics::{TopicRule, TopicRules};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Score substituted for a check that failed
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Minimum weighted score for a valid answer (inclusive)
pub const MIN_VALIDATION_SCORE: f64 = 0.7;

/// Weighted score reported as high quality
pub const HIGH_QUALITY_THRESHOLD: f64 = 0.85;

/// A check scoring below this contributes its suggestion
pub const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Why a single check could not produce a score
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("topic '{0}' has no terms to match")]
    EmptyTopic(String),

    #[error("score is not a finite number: {0}")]
    NonFinite(f64),

    #[error("check task failed: {0}")]
    Task(String),
}

/// Outcome of one check before settling
pub type CheckResult = Result<f64, CheckError>;

/// The seven quality dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Relevance,
    Accuracy,
    Completeness,
    Clarity,
    Consistency,
    FactualAccuracy,
    LogicalCoherence,
}

impl Criterion {
    /// All criteria in reporting order
    pub const ALL: [Criterion; 7] = [
        Criterion::Relevance,
        Criterion::Accuracy,
        Criterion::Completeness,
        Criterion::Clarity,
        Criterion::Consistency,
        Criterion::FactualAccuracy,
        Criterion::LogicalCoherence,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Criterion::Relevance => "relevance",
            Criterion::Accuracy => "accuracy",
            Criterion::Completeness => "completeness",
            Criterion::Clarity => "clarity",
            Criterion::Consistency => "consistency",
            Criterion::FactualAccuracy => "factual_accuracy",
            Criterion::LogicalCoherence => "logical_coherence",
        }
    }

    /// Key used for this criterion inside `quality_metrics`
    pub fn metric_key(&self) -> &'static str {
        match self {
            Criterion::Relevance => "relevance_score",
            Criterion::Accuracy => "accuracy_score",
            Criterion::Completeness => "completeness_score",
            Criterion::Clarity => "clarity_score",
            Criterion::Consistency => "consistency_score",
            Criterion::FactualAccuracy => "factual_accuracy",
            Criterion::LogicalCoherence => "logical_coherence",
        }
    }

    /// Weight in the overall score; all weights sum to 1.0
    pub fn weight(&self) -> f64 {
        match self {
            Criterion::Relevance => 0.20,
            Criterion::Accuracy => 0.25,
            Criterion::Completeness => 0.15,
            Criterion::Clarity => 0.10,
            Criterion::Consistency => 0.10,
            Criterion::FactualAccuracy => 0.15,
            Criterion::LogicalCoherence => 0.05,
        }
    }

    /// Improvement hint emitted when this criterion scores low
    pub fn suggestion(&self) -> &'static str {
        match self {
            Criterion::Relevance => "Answer could be more relevant to the specific question asked",
            Criterion::Accuracy => "Verify factual accuracy of the information provided",
            Criterion::Completeness => "Answer could cover more aspects of the question",
            Criterion::Clarity => "Consider restructuring for better clarity and readability",
            Criterion::Consistency => "Check for internal contradictions in the response",
            Criterion::FactualAccuracy => "Cross-reference with authoritative knowledge sources",
            Criterion::LogicalCoherence => "Add logical connectors to improve flow and coherence",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Criterion::Relevance => "Answer addresses the specific question asked",
            Criterion::Accuracy => "Information is factually correct",
            Criterion::Completeness => "Answer covers all relevant aspects",
            Criterion::Clarity => "Answer is clear and well-structured",
            Criterion::Consistency => "Answer is internally consistent",
            Criterion::FactualAccuracy => "Cross-referenced with knowledge base",
            Criterion::LogicalCoherence => "Answer flows logically",
        }
    }
}

/// Per-criterion scores, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    #[serde(rename = "relevance_score")]
    pub relevance: f64,
    #[serde(rename = "accuracy_score")]
    pub accuracy: f64,
    #[serde(rename = "completeness_score")]
    pub completeness: f64,
    #[serde(rename = "clarity_score")]
    pub clarity: f64,
    #[serde(rename = "consistency_score")]
    pub consistency: f64,
    pub factual_accuracy: f64,
    pub logical_coherence: f64,
}

impl QualityMetrics {
    /// Every criterion at [`NEUTRAL_SCORE`]
    pub fn neutral() -> Self {
        Self {
            relevance: NEUTRAL_SCORE,
            accuracy: NEUTRAL_SCORE,
            completeness: NEUTRAL_SCORE,
            clarity: NEUTRAL_SCORE,
            consistency: NEUTRAL_SCORE,
            factual_accuracy: NEUTRAL_SCORE,
            logical_coherence: NEUTRAL_SCORE,
        }
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Relevance => self.relevance,
            Criterion::Accuracy => self.accuracy,
            Criterion::Completeness => self.completeness,
            Criterion::Clarity => self.clarity,
            Criterion::Consistency => self.consistency,
            Criterion::FactualAccuracy => self.factual_accuracy,
            Criterion::LogicalCoherence => self.logical_coherence,
        }
    }

    pub fn set(&mut self, criterion: Criterion, score: f64) {
        let slot = match criterion {
            Criterion::Relevance => &mut self.relevance,
            Criterion::Accuracy => &mut self.accuracy,
            Criterion::Completeness => &mut self.completeness,
            Criterion::Clarity => &mut self.clarity,
            Criterion::Consistency => &mut self.consistency,
            Criterion::FactualAccuracy => &mut self.factual_accuracy,
            Criterion::LogicalCoherence => &mut self.logical_coherence,
        };
        *slot = score;
    }

    /// Weighted sum of all criteria
    pub fn weighted_score(&self) -> f64 {
        Criterion::ALL
            .iter()
            .map(|c| self.get(*c) * c.weight())
            .sum()
    }

    /// One suggestion per criterion below [`SUGGESTION_THRESHOLD`], in criterion order
    pub fn suggestions(&self) -> Vec<String> {
        Criterion::ALL
            .iter()
            .filter(|c| self.get(**c) < SUGGESTION_THRESHOLD)
            .map(|c| c.suggestion().to_string())
            .collect()
    }
}

/// Turn a check outcome into a usable score
///
/// Finite scores are clamped to [0, 1]. Errors and non-finite scores are
/// logged and replaced with [`NEUTRAL_SCORE`].
pub fn settle(criterion: Criterion, result: CheckResult) -> f64 {
    let result = result.and_then(|score| {
        if score.is_finite() {
            Ok(score)
        } else {
            Err(CheckError::NonFinite(score))
        }
    });

    match result {
        Ok(score) => score.clamp(0.0, 1.0),
        Err(e) => {
            warn!(criterion = criterion.name(), error = %e, "Check failed, using neutral score");
            NEUTRAL_SCORE
        }
    }
}
