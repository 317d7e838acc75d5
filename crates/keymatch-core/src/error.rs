//! Error types for the match engine.

use std::fmt;

use thiserror::Error;

/// Which input table an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    Reference,
    Offer,
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Offer => write!(f, "offer"),
        }
    }
}

/// Errors raised before or during a match run.
///
/// Every variant except [`MatchError::Cancelled`] is detected before any row
/// is processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// Key column or requested extra column is absent from its table.
    #[error("column '{column}' not found in {table} table")]
    MissingColumn { table: TableRole, column: String },

    /// A table header lists the same column twice.
    #[error("duplicate column '{column}' in table header")]
    DuplicateColumn { column: String },

    /// The offer key names a column the result table rewrites.
    #[error("reserved column '{column}' cannot be used as the offer key")]
    ReservedColumn { column: String },

    /// Fuzzy threshold outside the 0..=100 score range.
    #[error("fuzzy threshold {value} is outside the range 0..=100")]
    InvalidThreshold { value: f64 },

    /// Colliding column names cannot be told apart with an empty suffix.
    #[error("rename suffix must not be empty")]
    EmptyRenameSuffix,

    /// No key column name was configured for a table.
    #[error("{table} key column name is empty")]
    EmptyKeyColumn { table: TableRole },

    /// The observer asked the run to stop.
    #[error("match run cancelled")]
    Cancelled,
}

/// Result type for match operations.
pub type Result<T> = std::result::Result<T, MatchError>;
