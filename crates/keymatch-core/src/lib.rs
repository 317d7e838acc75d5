//! Cascading product-code matching between a reference table and an offer
//! table.
//!
//! Offer rows are linked to reference rows by a key column. Keys are compared
//! after [`normalize`], and rows that miss an exact lookup fall through three
//! looser tiers: zero-prefix correction, prefix containment, and token-sort
//! fuzzy similarity. The result keeps the offer table's row order.
//!
//! # Example
//!
//! ```ignore
//! use keymatch_core::{MatchConfig, Table, match_tables};
//!
//! let config = MatchConfig::new("Code", "Product no").with_extra_columns(["Price"]);
//! let (matched, unmatched) = match_tables(&reference, &offer, &config)?;
//! ```

#![deny(unsafe_code)]

mod assemble;
mod config;
mod engine;
mod error;
mod index;
mod model;
mod normalize;
mod observer;
mod score;

use tracing::{info, info_span};

pub use assemble::{MatchedRow, MatchedTable, ResultAssembler};
pub use config::{
    DEFAULT_FUZZY_THRESHOLD, DEFAULT_NO_MATCH_MARKER, DEFAULT_RENAME_SUFFIX, MATCHED_COLUMN,
    MatchConfig, RESERVED_COLUMNS, USED_CODE_COLUMN,
};
pub use engine::{MatchEngine, MatchResult, Tier};
pub use error::{MatchError, Result, TableRole};
pub use index::{ReferenceIndex, ReferenceRow};
pub use model::Table;
pub use normalize::{compact, normalize};
pub use observer::{CancelFlag, MatchObserver, NoopObserver};
pub use score::token_sort_ratio;

/// Match every offer row against the reference table.
///
/// Returns the annotated table and the number of rows left unmatched.
///
/// # Errors
///
/// Configuration and column errors are reported before any row is processed.
pub fn match_tables(
    reference: &Table,
    offer: &Table,
    config: &MatchConfig,
) -> Result<(MatchedTable, usize)> {
    match_tables_with_observer(reference, offer, config, &NoopObserver)
}

/// [`match_tables`] with progress reporting and cooperative cancellation.
///
/// # Errors
///
/// As [`match_tables`], plus [`MatchError::Cancelled`] when the observer
/// requests it.
///
/// `used_code` and `matched` columns already present in the offer table, as
/// in a previous result, are dropped and recomputed.
pub fn match_tables_with_observer(
    reference: &Table,
    offer: &Table,
    config: &MatchConfig,
    observer: &dyn MatchObserver,
) -> Result<(MatchedTable, usize)> {
    let span = info_span!(
        "match",
        reference_rows = reference.len(),
        offer_rows = offer.len()
    );
    let _guard = span.enter();

    config.validate()?;
    if RESERVED_COLUMNS.contains(&config.offer_key.as_str()) {
        return Err(MatchError::ReservedColumn {
            column: config.offer_key.clone(),
        });
    }

    // A previous result fed back in: its result columns are rebuilt.
    let stale: Vec<&str> = RESERVED_COLUMNS
        .iter()
        .copied()
        .filter(|name| offer.has_column(name))
        .collect();
    let stripped;
    let offer = if stale.is_empty() {
        offer
    } else {
        info!(columns = ?stale, "replacing result columns already in the offer table");
        stripped = offer.without_columns(&stale);
        &stripped
    };

    let offer_key = offer
        .column_index(&config.offer_key)
        .ok_or_else(|| MatchError::MissingColumn {
            table: TableRole::Offer,
            column: config.offer_key.clone(),
        })?;

    let index = ReferenceIndex::build(reference, config, offer.headers())?;
    let keys: Vec<&str> = offer
        .rows()
        .iter()
        .map(|cells| cells[offer_key].as_str())
        .collect();
    let results = MatchEngine::new(&index, config.fuzzy_threshold).run(&keys, observer)?;
    let table = ResultAssembler::new(&index, &config.no_match_marker)
        .assemble(offer, offer_key, results);

    let unmatched = table.unmatched_count();
    info!(
        rows = table.len(),
        matched = table.matched_count(),
        unmatched,
        "match complete"
    );
    Ok((table, unmatched))
}
