//! Key canonicalization for comparison.
//!
//! Only whitespace and case are folded. Punctuation is significant, so
//! `"AB-100"` and `"ab100"` stay distinct keys.

/// Removes every whitespace character, preserving case.
pub fn compact(raw: &str) -> String {
    raw.chars().filter(|ch| !ch.is_whitespace()).collect()
}

/// Removes every whitespace character and lowercases the rest.
pub fn normalize(raw: &str) -> String {
    compact(raw).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_inner_and_outer_whitespace() {
        assert_eq!(normalize("  AB 10\t0 \n"), "ab100");
    }

    #[test]
    fn test_normalize_keeps_punctuation() {
        assert_eq!(normalize(" AB-100 "), "ab-100");
        assert_ne!(normalize("AB-100"), normalize("ab100"));
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \u{a0} "), "");
    }

    #[test]
    fn test_compact_preserves_case() {
        assert_eq!(compact(" Xz 77 "), "Xz77");
    }
}
