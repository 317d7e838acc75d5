//! Immutable configuration for a single match run.

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result, TableRole};

/// Default minimum token-sort score for the fuzzy tier.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 80.0;
/// Default cell text for reference columns of unmatched rows.
pub const DEFAULT_NO_MATCH_MARKER: &str = "no match";
/// Default suffix appended to reference columns whose names collide.
pub const DEFAULT_RENAME_SUFFIX: &str = " (reference)";

/// Result column holding the key variant that produced the match.
pub const USED_CODE_COLUMN: &str = "used_code";
/// Result column holding `true`/`false` per row.
pub const MATCHED_COLUMN: &str = "matched";

/// Columns appended to every result table after the reference columns.
pub const RESERVED_COLUMNS: [&str; 2] = [USED_CODE_COLUMN, MATCHED_COLUMN];

/// Configuration passed explicitly into every match run.
///
/// Nothing here is mutated by the engine, so one value can drive any number
/// of concurrent runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Key column in the reference table.
    pub reference_key: String,
    /// Key column in the offer table.
    pub offer_key: String,
    /// Reference columns copied into matched offer rows.
    pub extra_columns: Vec<String>,
    /// Minimum fuzzy score (0-100) accepted by the last tier.
    pub fuzzy_threshold: f64,
    /// Text written into reference columns of unmatched rows.
    pub no_match_marker: String,
    /// Suffix used to disambiguate colliding reference column names.
    pub rename_suffix: String,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            reference_key: String::new(),
            offer_key: String::new(),
            extra_columns: Vec::new(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            no_match_marker: DEFAULT_NO_MATCH_MARKER.to_string(),
            rename_suffix: DEFAULT_RENAME_SUFFIX.to_string(),
        }
    }
}

impl MatchConfig {
    pub fn new(reference_key: impl Into<String>, offer_key: impl Into<String>) -> Self {
        Self {
            reference_key: reference_key.into(),
            offer_key: offer_key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_extra_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_no_match_marker(mut self, marker: impl Into<String>) -> Self {
        self.no_match_marker = marker.into();
        self
    }

    #[must_use]
    pub fn with_rename_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.rename_suffix = suffix.into();
        self
    }

    /// Checks the values that cannot be verified against table headers.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::EmptyKeyColumn`] when a key name is blank and
    /// [`MatchError::InvalidThreshold`] when the threshold is not a finite
    /// value within 0..=100. An empty rename suffix is
    /// [`MatchError::EmptyRenameSuffix`].
    pub fn validate(&self) -> Result<()> {
        if self.reference_key.trim().is_empty() {
            return Err(MatchError::EmptyKeyColumn {
                table: TableRole::Reference,
            });
        }
        if self.offer_key.trim().is_empty() {
            return Err(MatchError::EmptyKeyColumn {
                table: TableRole::Offer,
            });
        }
        if !(0.0..=100.0).contains(&self.fuzzy_threshold) {
            return Err(MatchError::InvalidThreshold {
                value: self.fuzzy_threshold,
            });
        }
        if self.rename_suffix.is_empty() {
            return Err(MatchError::EmptyRenameSuffix);
        }
        Ok(())
    }
}
