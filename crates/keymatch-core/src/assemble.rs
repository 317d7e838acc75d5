//! Merge match results back into offer rows.

use std::collections::BTreeMap;

use crate::config::{MATCHED_COLUMN, USED_CODE_COLUMN};
use crate::engine::{MatchResult, Tier};
use crate::index::ReferenceIndex;
use crate::model::Table;

/// An offer row annotated with its cascade outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRow {
    original_order: usize,
    offer_cells: Vec<String>,
    reference_cells: Vec<String>,
    used_code: String,
    result: MatchResult,
}

impl MatchedRow {
    /// Zero-based position of the row in the offer table.
    pub fn original_order(&self) -> usize {
        self.original_order
    }

    pub fn offer_cells(&self) -> &[String] {
        &self.offer_cells
    }

    /// Retained reference values, or the no-match marker for unmatched rows.
    pub fn reference_cells(&self) -> &[String] {
        &self.reference_cells
    }

    pub fn used_code(&self) -> &str {
        &self.used_code
    }

    pub fn result(&self) -> &MatchResult {
        &self.result
    }

    pub fn is_matched(&self) -> bool {
        self.result.is_matched()
    }

    /// Visible cells in [`MatchedTable::headers`] order.
    pub fn record(&self) -> Vec<String> {
        let mut record =
            Vec::with_capacity(self.offer_cells.len() + self.reference_cells.len() + 2);
        record.extend(self.offer_cells.iter().cloned());
        record.extend(self.reference_cells.iter().cloned());
        record.push(self.used_code.clone());
        record.push(self.is_matched().to_string());
        record
    }
}

/// Offer rows with their outcomes, ordered by original position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedTable {
    offer_columns: Vec<String>,
    reference_columns: Vec<String>,
    rows: Vec<MatchedRow>,
}

impl MatchedTable {
    /// Offer columns, then retained reference columns, then `used_code` and
    /// `matched`.
    pub fn headers(&self) -> Vec<String> {
        let mut headers = self.offer_columns.clone();
        headers.extend(self.reference_columns.iter().cloned());
        headers.push(USED_CODE_COLUMN.to_string());
        headers.push(MATCHED_COLUMN.to_string());
        headers
    }

    pub fn offer_columns(&self) -> &[String] {
        &self.offer_columns
    }

    /// Retained reference columns after collision renaming.
    pub fn reference_columns(&self) -> &[String] {
        &self.reference_columns
    }

    pub fn rows(&self) -> &[MatchedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn matched_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_matched()).count()
    }

    pub fn unmatched_count(&self) -> usize {
        self.len() - self.matched_count()
    }

    /// Matched rows per tier; tiers without matches are absent.
    pub fn tier_counts(&self) -> BTreeMap<Tier, usize> {
        let mut counts = BTreeMap::new();
        for tier in self.rows.iter().filter_map(|row| row.result.tier()) {
            *counts.entry(tier).or_insert(0) += 1;
        }
        counts
    }
}

/// Builds a [`MatchedTable`] from engine output.
#[derive(Debug, Clone, Copy)]
pub struct ResultAssembler<'a> {
    index: &'a ReferenceIndex,
    no_match_marker: &'a str,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(index: &'a ReferenceIndex, no_match_marker: &'a str) -> Self {
        Self {
            index,
            no_match_marker,
        }
    }

    /// Pair each offer row with the result at the same position.
    ///
    /// `results` must be aligned with `offer.rows()`.
    pub fn assemble(
        &self,
        offer: &Table,
        offer_key: usize,
        results: Vec<MatchResult>,
    ) -> MatchedTable {
        let mut rows: Vec<MatchedRow> = offer
            .rows()
            .iter()
            .zip(results)
            .enumerate()
            .map(|(original_order, (cells, result))| {
                self.resolve(original_order, cells, offer_key, result)
            })
            .collect();
        rows.sort_by_key(MatchedRow::original_order);

        MatchedTable {
            offer_columns: offer.headers().to_vec(),
            reference_columns: self.index.columns().to_vec(),
            rows,
        }
    }

    fn resolve(
        &self,
        original_order: usize,
        cells: &[String],
        offer_key: usize,
        result: MatchResult,
    ) -> MatchedRow {
        let (reference_cells, used_code) = match &result {
            MatchResult::Matched {
                reference,
                used_code,
                ..
            } => (reference.values().to_vec(), used_code.clone()),
            MatchResult::Unmatched => (
                vec![self.no_match_marker.to_string(); self.index.columns().len()],
                cells[offer_key].clone(),
            ),
        };
        MatchedRow {
            original_order,
            offer_cells: cells.to_vec(),
            reference_cells,
            used_code,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::engine::MatchEngine;
    use crate::observer::NoopObserver;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn test_assemble_fills_marker_and_used_code() {
        let reference = Table::from_rows(
            strings(&["code", "price"]),
            vec![strings(&["A1", "9.50"])],
        )
        .unwrap();
        let offer = Table::from_rows(
            strings(&["sku", "price"]),
            vec![strings(&["a 1", "10"]), strings(&["B2", "11"])],
        )
        .unwrap();
        let config = MatchConfig::new("code", "sku").with_extra_columns(["price"]);
        let index = ReferenceIndex::build(&reference, &config, offer.headers()).unwrap();
        let results = MatchEngine::new(&index, 80.0)
            .run(&["a 1", "B2"], &NoopObserver)
            .unwrap();
        let table = ResultAssembler::new(&index, "no match").assemble(&offer, 0, results);

        assert_eq!(
            table.headers(),
            strings(&["sku", "price", "code", "price (reference)", "used_code", "matched"])
        );
        assert_eq!(
            table.rows()[0].record(),
            strings(&["a 1", "10", "A1", "9.50", "a 1", "true"])
        );
        assert_eq!(
            table.rows()[1].record(),
            strings(&["B2", "11", "no match", "no match", "B2", "false"])
        );
        assert_eq!(table.unmatched_count(), 1);
        assert_eq!(table.tier_counts().get(&Tier::Exact), Some(&1));
    }
}
