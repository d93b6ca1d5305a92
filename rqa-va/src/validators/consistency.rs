//! Consistency check: contradictory statements in one answer

use tracing::debug;

use super::CheckResult;

/// Term pairs that should not both appear in one answer
pub const CONTRADICTIONS: &[(&str, &str)] = &[
    ("30 days", "60 days"),
    ("express", "standard"),
    ("warranty", "no warranty"),
    ("credit cards", "cash only"),
];

const CONSISTENT: f64 = 1.0;
const CONTRADICTORY: f64 = 0.3;

pub fn check_consistency(answer: &str) -> CheckResult {
    let answer_lower = answer.to_lowercase();

    let contradiction = CONTRADICTIONS
        .iter()
        .find(|(a, b)| answer_lower.contains(a) && answer_lower.contains(b));

    let score = match contradiction {
        Some((a, b)) => {
            debug!(first = a, second = b, "Contradictory terms found");
            CONTRADICTORY
        }
        None => CONSISTENT,
    };

    debug!(consistency = score, "Consistency check");
    Ok(score)
}
