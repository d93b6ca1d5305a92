//! Logical coherence check: presence of logical connectives

use tracing::debug;

use super::CheckResult;

pub const LOGICAL_CONNECTIVES: &[&str] =
    &["because", "therefore", "since", "as a result", "consequently"];

/// Number of distinct connectives present in the answer
pub fn count_connectives(answer: &str) -> usize {
    let answer_lower = answer.to_lowercase();
    LOGICAL_CONNECTIVES
        .iter()
        .filter(|c| answer_lower.contains(*c))
        .count()
}

pub fn check_logical_coherence(answer: &str) -> CheckResult {
    let connectives = count_connectives(answer);

    let coherence = match connectives {
        0 => 0.5,
        1 => 0.7,
        _ => 0.9,
    };

    debug!(coherence, connectives, "Logical coherence check");
    Ok(coherence)
}
