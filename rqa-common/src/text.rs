//! Text helpers for keyword heuristics
//!
//! All matching in the scoring heuristics is lowercase substring matching;
//! these helpers do the tokenizing.

use std::collections::HashSet;

/// Words ignored when extracting key terms from a question
pub const STOP_WORDS: &[&str] = &[
    "what", "is", "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of",
    "with", "by",
];

/// Minimum key term length is 3 characters
const MIN_TERM_CHARS: usize = 3;

/// Split into word runs (alphanumeric or `_`), lowercased
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Extract key terms: non-stop-words longer than two characters
///
/// Order and duplicates are preserved, so a term repeated in the question
/// counts once per occurrence.
///
/// ```
/// use rqa_common::text::extract_key_terms;
///
/// assert_eq!(
///     extract_key_terms("What is your return policy?"),
///     vec!["your", "return", "policy"]
/// );
/// ```
pub fn extract_key_terms(text: &str) -> Vec<String> {
    words(text)
        .into_iter()
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .filter(|w| w.chars().count() >= MIN_TERM_CHARS)
        .collect()
}

/// Set of whitespace-separated tokens (caller lowercases first)
pub fn whitespace_set(text: &str) -> HashSet<&str> {
    text.split_whitespace().collect()
}

/// Sentences: non-blank segments between runs of `.`, `!` and `?`
pub fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Fraction of `terms` appearing as substrings of `haystack`
///
/// `haystack` must already be lowercased. Returns `None` for an empty term list.
pub fn term_coverage<S: AsRef<str>>(haystack: &str, terms: &[S]) -> Option<f64> {
    if terms.is_empty() {
        return None;
    }
    let hits = terms
        .iter()
        .filter(|t| haystack.contains(t.as_ref()))
        .count();
    Some(hits as f64 / terms.len() as f64)
}
