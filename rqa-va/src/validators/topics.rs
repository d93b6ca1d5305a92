//! Topic-routed term checks (accuracy and completeness)
//!
//! The first topic keyword found in the question selects a term list; the
//! score is the fraction of those terms present in the answer. Questions
//! matching no topic get the rule set's fallback score.

use rqa_common::text::term_coverage;
use tracing::debug;

use super::{CheckError, CheckResult};

/// Score for questions outside every known topic (accuracy)
pub const ACCURACY_FALLBACK: f64 = 0.7;

/// Score for questions outside every known topic (completeness)
pub const COMPLETENESS_FALLBACK: f64 = 0.6;

/// One topic keyword and the terms an answer on that topic should contain
#[derive(Debug, Clone, PartialEq)]
pub struct TopicRule {
    pub topic: String,
    pub terms: Vec<String>,
}

impl TopicRule {
    pub fn new(topic: &str, terms: &[&str]) -> Self {
        Self {
            topic: topic.to_string(),
            terms: terms.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Ordered topic rules plus the score for unmatched questions
#[derive(Debug, Clone, PartialEq)]
pub struct TopicRules {
    rules: Vec<TopicRule>,
    fallback: f64,
}

impl TopicRules {
    pub fn new(rules: Vec<TopicRule>, fallback: f64) -> Self {
        Self { rules, fallback }
    }

    /// Expected facts per topic
    pub fn accuracy() -> Self {
        Self::new(
            vec![
                TopicRule::new("return policy", &["30 days", "receipt", "return", "policy"]),
                TopicRule::new("shipping", &["business days", "express", "delivery", "shipping"]),
                TopicRule::new("warranty", &["warranty", "manufacturer", "extended", "purchase"]),
                TopicRule::new("payment", &["credit cards", "paypal", "apple pay", "installment"]),
            ],
            ACCURACY_FALLBACK,
        )
    }

    /// Required aspects per topic
    pub fn completeness() -> Self {
        Self::new(
            vec![
                TopicRule::new("return policy", &["timeframe", "requirements", "process"]),
                TopicRule::new("shipping", &["timeframe", "options", "cost"]),
                TopicRule::new("warranty", &["duration", "coverage", "options"]),
                TopicRule::new("payment", &["methods", "options", "terms"]),
            ],
            COMPLETENESS_FALLBACK,
        )
    }

    pub fn rules(&self) -> &[TopicRule] {
        &self.rules
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }

    /// First rule whose topic keyword occurs in the question
    pub fn route(&self, question: &str) -> Option<&TopicRule> {
        let question_lower = question.to_lowercase();
        self.rules
            .iter()
            .find(|rule| question_lower.contains(&rule.topic))
    }

    /// Score `answer` against the rule selected by `question`
    pub fn score(&self, question: &str, answer: &str) -> CheckResult {
        let Some(rule) = self.route(question) else {
            return Ok(self.fallback);
        };

        let answer_lower = answer.to_lowercase();
        let coverage = term_coverage(&answer_lower, &rule.terms)
            .ok_or_else(|| CheckError::EmptyTopic(rule.topic.clone()))?;

        debug!(topic = %rule.topic, coverage, "Topic term coverage");
        Ok(coverage.min(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_three_of_four_terms() {
        let score = TopicRules::accuracy()
            .score(
                "What is your return policy?",
                "You can return items within 30 days with a receipt.",
            )
            .unwrap();
        assert_eq!(score, 0.75);
    }

    #[test]
    fn test_unmatched_topic_uses_fallback() {
        let q = "Do you sell gift cards?";
        assert_eq!(TopicRules::accuracy().score(q, "Yes").unwrap(), ACCURACY_FALLBACK);
        assert_eq!(TopicRules::completeness().score(q, "Yes").unwrap(), COMPLETENESS_FALLBACK);
    }

    #[test]
    fn test_first_matching_topic_wins() {
        // Mentions both shipping and payment; shipping comes first in the table
        let rules = TopicRules::accuracy();
        let rule = rules.route("Payment for express SHIPPING?").unwrap();
        assert_eq!(rule.topic, "shipping");
    }

    #[test]
    fn test_completeness_aspects() {
        let score = TopicRules::completeness()
            .score(
                "How does the warranty work?",
                "Coverage lasts one year; the duration can be extended.",
            )
            .unwrap();
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_answer_scores_zero_on_topic() {
        assert_eq!(TopicRules::accuracy().score("shipping times?", "").unwrap(), 0.0);
    }

    #[test]
    fn test_empty_term_list_is_an_error() {
        let rules = TopicRules::new(vec![TopicRule::new("refund", &[])], 0.7);
        let err = rules.score("refund please", "ok").unwrap_err();
        assert!(matches!(err, CheckError::EmptyTopic(topic) if topic == "refund"));
    }
}
