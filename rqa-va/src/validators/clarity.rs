//! Clarity check based on average sentence length

use rqa_common::text::{sentences, word_count};
use tracing::debug;

use super::CheckResult;

/// Average words per sentence by clarity band
const SHORT_SENTENCE_WORDS: f64 = 15.0;
const MEDIUM_SENTENCE_WORDS: f64 = 25.0;

pub fn check_clarity(answer: &str) -> CheckResult {
    let sentence_count = sentences(answer).len().max(1);
    let words = word_count(answer);
    let avg_sentence_length = words as f64 / sentence_count as f64;

    let clarity = if avg_sentence_length <= SHORT_SENTENCE_WORDS {
        0.9
    } else if avg_sentence_length <= MEDIUM_SENTENCE_WORDS {
        0.7
    } else {
        0.5
    };

    debug!(clarity, avg_sentence_length, sentence_count, "Clarity check");
    Ok(clarity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_short_sentences() {
        let answer = "You can return items within 30 days with a receipt. \
                      Therefore the policy is straightforward.";
        assert_eq!(check_clarity(answer).unwrap(), 0.9);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(check_clarity(&format!("{}.", words(15))).unwrap(), 0.9);
        assert_eq!(check_clarity(&format!("{}.", words(16))).unwrap(), 0.7);
        assert_eq!(check_clarity(&format!("{}.", words(25))).unwrap(), 0.7);
        assert_eq!(check_clarity(&format!("{}.", words(26))).unwrap(), 0.5);
    }

    #[test]
    fn test_empty_answer_does_not_divide_by_zero() {
        assert_eq!(check_clarity("").unwrap(), 0.9);
        assert_eq!(check_clarity("?!.").unwrap(), 0.9);
    }

    #[test]
    fn test_no_terminal_punctuation_is_one_sentence() {
        assert_eq!(check_clarity(&words(30)).unwrap(), 0.5);
    }
}
