//! Relevance check: does the answer mention what the question asks about?

use rqa_common::text::extract_key_terms;
use tracing::debug;

use super::CheckResult;

/// Fraction of the question's key terms found in the answer
///
/// A question without key terms divides by 1, so it scores 0.0.
pub fn check_relevance(question: &str, answer: &str) -> CheckResult {
    let answer_lower = answer.to_lowercase();
    let key_terms = extract_key_terms(question);

    let matches = key_terms
        .iter()
        .filter(|term| answer_lower.contains(term.as_str()))
        .count();
    let relevance = (matches as f64 / key_terms.len().max(1) as f64).min(1.0);

    debug!(relevance, key_terms = key_terms.len(), matches, "Relevance check");
    Ok(relevance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_term_match() {
        // key terms: your, return, policy
        let score = check_relevance(
            "What is your return policy?",
            "You can return items within 30 days. The policy is simple.",
        )
        .unwrap();
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_terms_match() {
        let score = check_relevance("Shipping options?", "Our shipping options are many").unwrap();
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_no_key_terms_scores_zero() {
        assert_eq!(check_relevance("What is it?", "Anything at all").unwrap(), 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(check_relevance("WARRANTY", "the warranty lasts a year").unwrap(), 1.0);
    }
}
