//! Lightweight answer check served by the knowledge store
//!
//! Much cheaper than the validation service: answer length stands in for
//! completeness and question/answer word overlap for accuracy.

use rqa_common::text::whitespace_set;
use serde::{Deserialize, Serialize};

/// Answer length (in characters) that earns full completeness
const FULL_LENGTH_CHARS: f64 = 100.0;

const MIN_COMPLETENESS: f64 = 0.3;
const MIN_ACCURACY: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicValidation {
    pub is_valid: bool,
    pub completeness_score: f64,
    pub accuracy_score: f64,
    pub confidence_boost: f64,
}

/// Trust attached to each answer source
pub fn confidence_boost(source: &str) -> f64 {
    match source {
        "manual_knowledge" => 0.9,
        "ai_memory" => 0.7,
        "fallback" => 0.1,
        _ => 0.5,
    }
}

pub fn basic_validation(question: &str, answer: &str, source: &str) -> BasicValidation {
    let completeness_score = (answer.chars().count() as f64 / FULL_LENGTH_CHARS).min(1.0);

    let question_lower = question.to_lowercase();
    let answer_lower = answer.to_lowercase();
    let question_words = whitespace_set(&question_lower);
    let answer_words = whitespace_set(&answer_lower);
    let overlap = question_words.intersection(&answer_words).count();
    let accuracy_score = overlap as f64 / question_words.len().max(1) as f64;

    BasicValidation {
        is_valid: completeness_score > MIN_COMPLETENESS && accuracy_score > MIN_ACCURACY,
        completeness_score,
        accuracy_score,
        confidence_boost: confidence_boost(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness_by_length() {
        let short = basic_validation("q", "yes", "fallback");
        assert!((short.completeness_score - 0.03).abs() < 1e-9);
        let long = basic_validation("q", &"x".repeat(250), "fallback");
        assert_eq!(long.completeness_score, 1.0);
    }

    #[test]
    fn test_accuracy_word_overlap() {
        // question words: how, long, is, shipping (4); shared: shipping, is
        let result = basic_validation("how long is shipping", "shipping is fast", "x");
        assert_eq!(result.accuracy_score, 0.5);
    }

    #[test]
    fn test_source_boost() {
        assert_eq!(confidence_boost("manual_knowledge"), 0.9);
        assert_eq!(confidence_boost("ai_memory"), 0.7);
        assert_eq!(confidence_boost("fallback"), 0.1);
        assert_eq!(confidence_boost("elsewhere"), 0.5);
    }

    #[test]
    fn test_validity_needs_both() {
        let answer = "Shipping takes 3-5 business days for all standard orders placed before noon on weekdays.";
        assert!(basic_validation("How long does shipping take?", answer, "manual_knowledge").is_valid);
        assert!(!basic_validation("Completely unrelated?", answer, "manual_knowledge").is_valid);
        assert!(!basic_validation("shipping", "shipping", "manual_knowledge").is_valid);
    }

    #[test]
    fn test_empty_question() {
        let result = basic_validation("", "answer", "x");
        assert_eq!(result.accuracy_score, 0.0);
        assert!(!result.is_valid);
    }
}
