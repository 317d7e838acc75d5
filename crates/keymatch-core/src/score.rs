//! Token-sort similarity used by the fuzzy tier.
//!
//! Scores are on a 0 to 100 scale and symmetric in their arguments.

use rapidfuzz::distance::indel;

/// Token-sort ratio between two strings.
///
/// Both inputs are split on whitespace, the tokens sorted and rejoined with a
/// single space, and the normalized Indel similarity of the results is scaled
/// to 0..=100. Two empty strings score 100.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let a = sorted_tokens(a);
    let b = sorted_tokens(b);
    indel_ratio(&a, &b)
}

fn sorted_tokens(raw: &str) -> String {
    let mut tokens: Vec<&str> = raw.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// `100 * (total_len - indel_distance) / total_len`, over chars.
///
/// Computed from integer counts so that boundary scores such as exactly 80
/// compare equal to an 80 threshold.
fn indel_ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 100.0;
    }
    let distance = indel::distance(a.chars(), b.chars());
    (total - distance) as f64 * 100.0 / total as f64
}
