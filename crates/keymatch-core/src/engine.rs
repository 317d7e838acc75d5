//! Tier cascade: exact, zero-prefix, containment, fuzzy.
//!
//! Tiers run in that fixed order over the set of rows still unmatched, so a
//! row matched by tier k is never seen by tier k+1. Within a tier, rows are
//! independent; the fuzzy tier fans out over the rayon pool and its results
//! are written back by row position.

use std::fmt;

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MatchError, Result};
use crate::index::{ReferenceIndex, ReferenceRow};
use crate::normalize::{compact, normalize};
use crate::observer::MatchObserver;
use crate::score::token_sort_ratio;

/// One strategy of the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Normalized offer key equals a normalized reference key.
    Exact,
    /// Offer key with a leading `"0"` equals a reference key.
    ZeroPrefix,
    /// One normalized key is a prefix of the other.
    Containment,
    /// Token-sort similarity at or above the threshold.
    Fuzzy,
}

impl Tier {
    /// Cascade order.
    pub const ALL: [Tier; 4] = [Tier::Exact, Tier::ZeroPrefix, Tier::Containment, Tier::Fuzzy];

    /// 1-based position in the cascade.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Exact => 1,
            Self::ZeroPrefix => 2,
            Self::Containment => 3,
            Self::Fuzzy => 4,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::ZeroPrefix => "zero-prefix",
            Self::Containment => "containment",
            Self::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Outcome of the cascade for one offer row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Matched {
        reference: ReferenceRow,
        /// Key string, after the tier's transformation, that produced the hit.
        used_code: String,
        tier: Tier,
    },
    Unmatched,
}

impl MatchResult {
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    pub fn tier(&self) -> Option<Tier> {
        match self {
            Self::Matched { tier, .. } => Some(*tier),
            Self::Unmatched => None,
        }
    }
}

/// Runs the cascade against one [`ReferenceIndex`].
#[derive(Debug, Clone, Copy)]
pub struct MatchEngine<'a> {
    index: &'a ReferenceIndex,
    fuzzy_threshold: f64,
}

impl<'a> MatchEngine<'a> {
    pub fn new(index: &'a ReferenceIndex, fuzzy_threshold: f64) -> Self {
        Self {
            index,
            fuzzy_threshold,
        }
    }

    /// Full cascade for a single raw key.
    pub fn match_key(&self, raw_key: &str) -> MatchResult {
        let normalized = normalize(raw_key);
        if normalized.is_empty() {
            return MatchResult::Unmatched;
        }
        Tier::ALL
            .into_iter()
            .find_map(|tier| self.try_tier(tier, raw_key, &normalized))
            .unwrap_or(MatchResult::Unmatched)
    }

    /// Cascade over every key, one tier at a time.
    ///
    /// The returned vector is aligned with `raw_keys`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Cancelled`] when the observer requests it.
    pub fn run(
        &self,
        raw_keys: &[&str],
        observer: &dyn MatchObserver,
    ) -> Result<Vec<MatchResult>> {
        let normalized: Vec<String> = raw_keys.iter().map(|key| normalize(key)).collect();
        let mut results: Vec<Option<MatchResult>> = vec![None; raw_keys.len()];

        let mut pending: Vec<usize> = (0..raw_keys.len())
            .filter(|&row| !normalized[row].is_empty())
            .collect();
        let empty_keys = raw_keys.len() - pending.len();
        if empty_keys > 0 {
            info!(empty_keys, "offer rows with empty keys left unmatched");
        }

        for tier in Tier::ALL {
            if pending.is_empty() {
                break;
            }
            if observer.is_cancelled() {
                return Err(MatchError::Cancelled);
            }
            observer.tier_started(tier, pending.len());
            info!(tier = %tier, pending = pending.len(), "running match tier");

            let evaluate = |row: usize| {
                let outcome = self.try_tier(tier, raw_keys[row], &normalized[row]);
                observer.row_evaluated(tier);
                outcome
            };
            let outcomes: Vec<Option<MatchResult>> = if tier == Tier::Fuzzy {
                pending
                    .par_iter()
                    .map(|&row| {
                        if observer.is_cancelled() {
                            return Err(MatchError::Cancelled);
                        }
                        Ok(evaluate(row))
                    })
                    .collect::<Result<_>>()?
            } else {
                pending.iter().map(|&row| evaluate(row)).collect()
            };

            let attempted = pending.len();
            let mut remaining = Vec::new();
            for (row, outcome) in pending.into_iter().zip(outcomes) {
                match outcome {
                    Some(result) => {
                        if let MatchResult::Matched { used_code, .. } = &result {
                            debug!(row, tier = %tier, used_code = %used_code, "row matched");
                        }
                        results[row] = Some(result);
                    }
                    None => remaining.push(row),
                }
            }
            info!(
                tier = %tier,
                matched = attempted - remaining.len(),
                remaining = remaining.len(),
                "match tier complete"
            );
            pending = remaining;
        }

        Ok(results
            .into_iter()
            .map(|result| result.unwrap_or(MatchResult::Unmatched))
            .collect())
    }

    fn try_tier(&self, tier: Tier, raw_key: &str, normalized: &str) -> Option<MatchResult> {
        match tier {
            Tier::Exact => self.exact(raw_key, normalized),
            Tier::ZeroPrefix => self.zero_prefix(raw_key),
            Tier::Containment => self.containment(normalized),
            Tier::Fuzzy => self.fuzzy(normalized),
        }
    }

    fn exact(&self, raw_key: &str, normalized: &str) -> Option<MatchResult> {
        self.index.get(normalized).map(|reference| MatchResult::Matched {
            reference: reference.clone(),
            used_code: raw_key.to_string(),
            tier: Tier::Exact,
        })
    }

    fn zero_prefix(&self, raw_key: &str) -> Option<MatchResult> {
        let prefixed = format!("0{raw_key}");
        self.index
            .get(&normalize(&prefixed))
            .map(|reference| MatchResult::Matched {
                reference: reference.clone(),
                used_code: format!("0{}", compact(raw_key)),
                tier: Tier::ZeroPrefix,
            })
    }

    /// First reference key, in reference order, that is a prefix of the
    /// offer key or has the offer key as a prefix. Not longest-match.
    fn containment(&self, normalized: &str) -> Option<MatchResult> {
        self.index
            .rows()
            .iter()
            .find(|reference| {
                let key = reference.normalized_key();
                normalized.starts_with(key) || key.starts_with(normalized)
            })
            .map(|reference| MatchResult::Matched {
                reference: reference.clone(),
                used_code: reference.normalized_key().to_string(),
                tier: Tier::Containment,
            })
    }

    /// Best token-sort score over all reference keys; ties keep the earliest.
    fn fuzzy(&self, normalized: &str) -> Option<MatchResult> {
        let mut best: Option<(&ReferenceRow, f64)> = None;
        for reference in self.index.rows() {
            let score = token_sort_ratio(normalized, reference.normalized_key());
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((reference, score));
            }
        }
        let (reference, score) = best?;
        if score < self.fuzzy_threshold {
            return None;
        }
        debug!(score, key = reference.normalized_key(), "fuzzy candidate accepted");
        Some(MatchResult::Matched {
            reference: reference.clone(),
            used_code: reference.normalized_key().to_string(),
            tier: Tier::Fuzzy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::model::Table;
    use crate::observer::{CancelFlag, NoopObserver};

    fn index(keys: &[&str]) -> ReferenceIndex {
        let table = Table::from_rows(
            vec!["code".to_string()],
            keys.iter().map(|key| vec![(*key).to_string()]).collect(),
        )
        .unwrap();
        ReferenceIndex::build(&table, &MatchConfig::new("code", "sku"), &[]).unwrap()
    }

    fn matched(result: &MatchResult) -> (Tier, &str, &str) {
        match result {
            MatchResult::Matched {
                reference,
                used_code,
                tier,
            } => (*tier, used_code.as_str(), reference.raw_key()),
            MatchResult::Unmatched => panic!("expected a match, got {result:?}"),
        }
    }

    #[test]
    fn test_exact_tier_uses_raw_offer_key() {
        let index = index(&["AB-100", "ab100", "XZ-77"]);
        let engine = MatchEngine::new(&index, 80.0);
        let result = engine.match_key(" AB-100 ");
        assert_eq!(matched(&result), (Tier::Exact, " AB-100 ", "AB-100"));
    }

    #[test]
    fn test_zero_prefix_tier() {
        let index = index(&["01234"]);
        let engine = MatchEngine::new(&index, 80.0);
        let result = engine.match_key("1234");
        assert_eq!(matched(&result), (Tier::ZeroPrefix, "01234", "01234"));
    }

    #[test]
    fn test_zero_prefix_used_code_drops_whitespace_keeps_case() {
        let index = index(&["0ab12"]);
        let engine = MatchEngine::new(&index, 80.0);
        let result = engine.match_key(" AB 12");
        assert_eq!(matched(&result), (Tier::ZeroPrefix, "0AB12", "0ab12"));
    }

    #[test]
    fn test_containment_tier_offer_longer() {
        let index = index(&["XZ-777"]);
        let engine = MatchEngine::new(&index, 80.0);
        let result = engine.match_key("XZ-777-A");
        assert_eq!(matched(&result), (Tier::Containment, "xz-777", "XZ-777"));
    }

    #[test]
    fn test_containment_tier_reference_longer() {
        let index = index(&["Q1-500-BLUE"]);
        let engine = MatchEngine::new(&index, 80.0);
        let result = engine.match_key("q1-500");
        assert_eq!(matched(&result), (Tier::Containment, "q1-500-blue", "Q1-500-BLUE"));
    }

    #[test]
    fn test_containment_is_first_match_not_longest() {
        let index = index(&["XZ", "XZ-777"]);
        let engine = MatchEngine::new(&index, 80.0);
        let result = engine.match_key("XZ-777-A");
        assert_eq!(matched(&result).1, "xz");
    }

    #[test]
    fn test_fuzzy_tier_threshold() {
        let index = index(&["abcdf"]);
        let result = MatchEngine::new(&index, 80.0).match_key("abcde");
        assert_eq!(matched(&result), (Tier::Fuzzy, "abcdf", "abcdf"));

        let result = MatchEngine::new(&index, 95.0).match_key("abcde");
        assert_eq!(result, MatchResult::Unmatched);
    }

    #[test]
    fn test_fuzzy_threshold_boundary() {
        let index = index(&["abcdf"]);
        assert!(MatchEngine::new(&index, 80.0).match_key("abcde").is_matched());
        assert!(!MatchEngine::new(&index, 80.01).match_key("abcde").is_matched());
        assert!(!MatchEngine::new(&index, 81.0).match_key("abcde").is_matched());
    }

    #[test]
    fn test_fuzzy_tie_keeps_first_reference_key() {
        let index = index(&["abcdx", "abcdy"]);
        let result = MatchEngine::new(&index, 80.0).match_key("abcdz");
        assert_eq!(matched(&result).1, "abcdx");
    }

    #[test]
    fn test_empty_offer_key_never_matches() {
        let index = index(&["0", "A"]);
        let engine = MatchEngine::new(&index, 0.0);
        assert_eq!(engine.match_key(""), MatchResult::Unmatched);
        assert_eq!(engine.match_key("   "), MatchResult::Unmatched);
        let results = engine.run(&["", " "], &NoopObserver).unwrap();
        assert_eq!(results, vec![MatchResult::Unmatched, MatchResult::Unmatched]);
    }

    #[test]
    fn test_earlier_tier_wins() {
        // "1234" would also satisfy containment against "12345", but the
        // zero-prefixed key hits first.
        let index = index(&["12345", "01234"]);
        let result = MatchEngine::new(&index, 80.0).match_key("1234");
        assert_eq!(matched(&result).0, Tier::ZeroPrefix);
    }

    #[test]
    fn test_run_agrees_with_per_key_cascade() {
        let index = index(&["AB-100", "01234", "XZ-777", "abcdf"]);
        let engine = MatchEngine::new(&index, 80.0);
        let keys = ["ab-100", "1234", "XZ-777-A", "abcde", "zzzzzz", ""];
        let results = engine.run(&keys, &NoopObserver).unwrap();
        let expected: Vec<MatchResult> = keys.iter().map(|key| engine.match_key(key)).collect();
        assert_eq!(results, expected);
        let tiers: Vec<Option<Tier>> = results.iter().map(MatchResult::tier).collect();
        assert_eq!(
            tiers,
            vec![
                Some(Tier::Exact),
                Some(Tier::ZeroPrefix),
                Some(Tier::Containment),
                Some(Tier::Fuzzy),
                None,
                None
            ]
        );
    }

    #[test]
    fn test_run_honours_cancellation() {
        let index = index(&["A"]);
        let flag = CancelFlag::new();
        flag.cancel();
        let err = MatchEngine::new(&index, 80.0)
            .run(&["A"], &flag)
            .unwrap_err();
        assert_eq!(err, MatchError::Cancelled);
    }

    #[test]
    fn test_tier_numbers() {
        let numbers: Vec<u8> = Tier::ALL.iter().map(|tier| tier.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }
}
