//! Answer Validator
//!
//! Runs the seven checks, settles each into a clamped score, and derives the
//! weighted verdict.
//!
//! # Scoring Algorithm
//! - relevance 0.20, accuracy 0.25, completeness 0.15, clarity 0.10,
//!   consistency 0.10, factual_accuracy 0.15, logical_coherence 0.05
//! - valid iff weighted score ≥ 0.7
//!
//! The factual lookup is spawned as its own task so the six text checks run
//! while the knowledge store call is in flight.

use rqa_common::api::AnswerSource;
use std::sync::Arc;
use tracing::{debug, info};

use super::clarity::check_clarity;
use super::coherence::check_logical_coherence;
use super::consistency::check_consistency;
use super::factual::{check_factual_accuracy, ReferenceSource};
use super::relevance::check_relevance;
use super::topics::TopicRules;
use super::{settle, CheckError, Criterion, QualityMetrics, MIN_VALIDATION_SCORE};

/// Reason reported for every answer at or above the threshold
pub const VALID_REASON: &str = "Answer meets quality standards for agentic AI systems";

/// Validation outcome for one (question, answer) pair
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub metrics: QualityMetrics,
    pub score: f64,
    pub is_valid: bool,
    pub reason: String,
    pub suggestions: Vec<String>,
}

impl Verdict {
    /// Derive score, validity, reason and suggestions from settled metrics
    pub fn from_metrics(metrics: QualityMetrics) -> Self {
        let score = metrics.weighted_score();
        let is_valid = score >= MIN_VALIDATION_SCORE;

        let reason = if is_valid {
            VALID_REASON.to_string()
        } else {
            format!(
                "Answer quality score ({:.2}) below threshold ({})",
                score, MIN_VALIDATION_SCORE
            )
        };

        Self {
            suggestions: metrics.suggestions(),
            metrics,
            score,
            is_valid,
            reason,
        }
    }
}

/// Multi-criterion answer validator
pub struct AnswerValidator {
    reference: Arc<dyn ReferenceSource>,
    accuracy_rules: TopicRules,
    completeness_rules: TopicRules,
}

impl AnswerValidator {
    /// Create a validator with the built-in topic tables
    pub fn new(reference: Arc<dyn ReferenceSource>) -> Self {
        Self::with_topic_rules(reference, TopicRules::accuracy(), TopicRules::completeness())
    }

    /// Create a validator with custom topic tables
    pub fn with_topic_rules(
        reference: Arc<dyn ReferenceSource>,
        accuracy_rules: TopicRules,
        completeness_rules: TopicRules,
    ) -> Self {
        Self {
            reference,
            accuracy_rules,
            completeness_rules,
        }
    }

    /// Score all seven criteria
    pub async fn assess(&self, question: &str, answer: &str) -> QualityMetrics {
        let reference = Arc::clone(&self.reference);
        let (lookup_question, lookup_answer) = (question.to_string(), answer.to_string());
        let lookup = tokio::spawn(async move {
            check_factual_accuracy(reference.as_ref(), &lookup_question, &lookup_answer).await
        });

        let mut metrics = QualityMetrics::neutral();
        let text_checks = [
            (Criterion::Relevance, check_relevance(question, answer)),
            (Criterion::Accuracy, self.accuracy_rules.score(question, answer)),
            (Criterion::Completeness, self.completeness_rules.score(question, answer)),
            (Criterion::Clarity, check_clarity(answer)),
            (Criterion::Consistency, check_consistency(answer)),
            (Criterion::LogicalCoherence, check_logical_coherence(answer)),
        ];
        for (criterion, result) in text_checks {
            metrics.set(criterion, settle(criterion, result));
        }

        let factual = lookup
            .await
            .unwrap_or_else(|e| Err(CheckError::Task(e.to_string())));
        metrics.set(
            Criterion::FactualAccuracy,
            settle(Criterion::FactualAccuracy, factual),
        );

        debug!(?metrics, "Quality assessment complete");
        metrics
    }

    /// Assess and derive the verdict
    pub async fn validate(&self, question: &str, answer: &str, source: AnswerSource) -> Verdict {
        let verdict = Verdict::from_metrics(self.assess(question, answer).await);

        info!(
            source = source.as_str(),
            score = verdict.score,
            is_valid = verdict.is_valid,
            suggestions = verdict.suggestions.len(),
            "Answer validated"
        );
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{TopicRule, NEUTRAL_SCORE};
    use async_trait::async_trait;

    struct NoReference;

    #[async_trait]
    impl ReferenceSource for NoReference {
        async fn reference_answer(&self, _q: &str) -> rqa_common::Result<Option<String>> {
            Ok(None)
        }
    }

    struct PanickingReference;

    #[async_trait]
    impl ReferenceSource for PanickingReference {
        async fn reference_answer(&self, _q: &str) -> rqa_common::Result<Option<String>> {
            panic!("reference backend bug");
        }
    }

    fn metrics_with(score: f64) -> QualityMetrics {
        let mut m = QualityMetrics::neutral();
        for c in Criterion::ALL {
            m.set(c, score);
        }
        m
    }

    /// relevance, accuracy, completeness and clarity at 1.0 weigh 0.70
    fn four_ones(clarity: f64) -> QualityMetrics {
        let mut m = metrics_with(0.0);
        m.set(Criterion::Relevance, 1.0);
        m.set(Criterion::Accuracy, 1.0);
        m.set(Criterion::Completeness, 1.0);
        m.set(Criterion::Clarity, clarity);
        m
    }

    #[test]
    fn test_validity_boundary_is_inclusive() {
        let at_boundary = Verdict::from_metrics(four_ones(1.0));
        assert!((at_boundary.score - 0.7).abs() < 1e-9);
        assert!(at_boundary.is_valid, "score {} should be valid", at_boundary.score);
        assert_eq!(at_boundary.reason, VALID_REASON);

        let all_seventy = Verdict::from_metrics(metrics_with(0.7));
        assert!(all_seventy.is_valid, "score {} should be valid", all_seventy.score);
        assert!(all_seventy.suggestions.is_empty());

        let below = Verdict::from_metrics(four_ones(0.69));
        assert!((below.score - 0.669).abs() < 1e-9);
        assert!(!below.is_valid);
        assert_eq!(below.reason, "Answer quality score (0.67) below threshold (0.7)");
    }

    #[test]
    fn test_reason_texts() {
        let low = Verdict::from_metrics(metrics_with(0.5));
        assert!(!low.is_valid);
        assert_eq!(low.reason, "Answer quality score (0.50) below threshold (0.7)");

        let ok = Verdict::from_metrics(metrics_with(0.75));
        assert!(ok.is_valid);
        assert_eq!(ok.reason, VALID_REASON);

        // No separate wording above the high quality threshold
        let high = Verdict::from_metrics(metrics_with(0.9));
        assert_eq!(high.reason, VALID_REASON);
    }

    #[tokio::test]
    async fn test_return_policy_scenario() {
        let validator = AnswerValidator::new(Arc::new(NoReference));
        let metrics = validator
            .assess(
                "What is your return policy?",
                "You can return items within 30 days with a receipt. \
                 Therefore the policy is straightforward.",
            )
            .await;

        assert_eq!(metrics.clarity, 0.9);
        assert_eq!(metrics.logical_coherence, 0.7);
        assert_eq!(metrics.consistency, 1.0);
        // "30 days", "receipt", "return" and "policy" all appear
        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.completeness, 0.0);
        assert!((metrics.relevance - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.factual_accuracy, 0.6);
    }

    #[tokio::test]
    async fn test_empty_answer_off_topic() {
        let validator = AnswerValidator::new(Arc::new(NoReference));
        let metrics = validator.assess("Do you sell gift cards?", "").await;

        assert_eq!(metrics.clarity, 0.9);
        assert_eq!(metrics.accuracy, 0.7);
        assert_eq!(metrics.completeness, 0.6);
        assert_eq!(metrics.relevance, 0.0);
    }

    #[tokio::test]
    async fn test_failed_check_is_neutral_and_others_unaffected() {
        let validator = AnswerValidator::with_topic_rules(
            Arc::new(NoReference),
            TopicRules::new(vec![TopicRule::new("refund", &[])], 0.7),
            TopicRules::completeness(),
        );
        let metrics = validator.assess("refund please", "Because it broke.").await;

        assert_eq!(metrics.accuracy, NEUTRAL_SCORE);
        assert_eq!(metrics.completeness, 0.6);
        assert_eq!(metrics.logical_coherence, 0.7);
    }

    #[tokio::test]
    async fn test_panicking_lookup_is_neutral() {
        let validator = AnswerValidator::new(Arc::new(PanickingReference));
        let metrics = validator.assess("shipping?", "Express delivery.").await;

        assert_eq!(metrics.factual_accuracy, NEUTRAL_SCORE);
        assert_eq!(metrics.consistency, 1.0);
    }

    #[tokio::test]
    async fn test_scores_bounded() {
        let validator = AnswerValidator::new(Arc::new(NoReference));
        let long_answer = "credit cards paypal apple pay installment ".repeat(50);
        let inputs = [
            ("", ""),
            ("shipping shipping shipping", "shipping"),
            ("What is the warranty?", "No warranty. Warranty! Because since therefore."),
            ("payment", long_answer.as_str()),
        ];
        for (q, a) in inputs {
            let verdict = validator.validate(q, a, AnswerSource::Combined).await;
            for c in Criterion::ALL {
                let s = verdict.metrics.get(c);
                assert!((0.0..=1.0).contains(&s), "{} out of range: {}", c.name(), s);
            }
            assert!((0.0..=1.0).contains(&verdict.score));
            assert!(verdict.suggestions.len() <= 7);
            if verdict.is_valid {
                assert_eq!(verdict.reason, VALID_REASON);
            } else {
                assert!(verdict.reason.contains("below threshold (0.7)"));
            }
        }
    }
}
