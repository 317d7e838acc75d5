//! Deduplicated reference lookup keyed by normalized key.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::{debug, info};

use crate::config::{MatchConfig, RESERVED_COLUMNS};
use crate::error::{MatchError, Result, TableRole};
use crate::model::Table;
use crate::normalize::normalize;

/// A reference row that survived deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRow {
    raw_key: String,
    normalized_key: String,
    source_row: usize,
    values: Vec<String>,
}

impl ReferenceRow {
    pub fn raw_key(&self) -> &str {
        &self.raw_key
    }

    pub fn normalized_key(&self) -> &str {
        &self.normalized_key
    }

    /// Zero-based position of the row in the reference table.
    pub fn source_row(&self) -> usize {
        self.source_row
    }

    /// Retained values, aligned with [`ReferenceIndex::columns`].
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// First-occurrence view of the reference table.
///
/// Rows keep reference-table order. The retained schema is the key column
/// followed by the requested extra columns, each renamed when it collides
/// with an offer column or a reserved result column.
#[derive(Debug, Clone)]
pub struct ReferenceIndex {
    columns: Vec<String>,
    rows: Vec<ReferenceRow>,
    by_key: BTreeMap<String, usize>,
    duplicates_dropped: usize,
    empty_keys_skipped: usize,
}

impl ReferenceIndex {
    /// Build the index for one match run.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::MissingColumn`] when the reference key column or
    /// any extra column is absent from `reference`, and
    /// [`MatchError::EmptyRenameSuffix`] when the rename suffix is empty.
    pub fn build(
        reference: &Table,
        config: &MatchConfig,
        offer_headers: &[String],
    ) -> Result<Self> {
        if config.rename_suffix.is_empty() {
            return Err(MatchError::EmptyRenameSuffix);
        }
        let key_index = reference
            .column_index(&config.reference_key)
            .ok_or_else(|| MatchError::MissingColumn {
                table: TableRole::Reference,
                column: config.reference_key.clone(),
            })?;

        let mut source_columns = vec![key_index];
        let mut source_names = vec![config.reference_key.as_str()];
        for column in &config.extra_columns {
            let index = reference
                .column_index(column)
                .ok_or_else(|| MatchError::MissingColumn {
                    table: TableRole::Reference,
                    column: column.clone(),
                })?;
            if index == key_index {
                info!(column = %column, "reference key column removed from extra columns");
                continue;
            }
            if source_columns.contains(&index) {
                continue;
            }
            source_columns.push(index);
            source_names.push(column.as_str());
        }

        let columns = rename_colliding(&source_names, offer_headers, &config.rename_suffix);
        for (original, renamed) in source_names.iter().zip(&columns) {
            if original != renamed {
                info!(from = %original, to = %renamed, "renamed colliding reference column");
            }
        }

        let mut rows = Vec::new();
        let mut by_key = BTreeMap::new();
        let mut duplicates_dropped = 0usize;
        let mut empty_keys_skipped = 0usize;
        for (source_row, cells) in reference.rows().iter().enumerate() {
            let raw_key = &cells[key_index];
            let normalized_key = normalize(raw_key);
            if normalized_key.is_empty() {
                empty_keys_skipped += 1;
                continue;
            }
            match by_key.entry(normalized_key) {
                Entry::Occupied(_) => duplicates_dropped += 1,
                Entry::Vacant(slot) => {
                    let normalized_key = slot.key().clone();
                    slot.insert(rows.len());
                    rows.push(ReferenceRow {
                        raw_key: raw_key.clone(),
                        normalized_key,
                        source_row,
                        values: source_columns.iter().map(|&col| cells[col].clone()).collect(),
                    });
                }
            }
        }

        info!(
            unique_keys = rows.len(),
            duplicates_dropped,
            empty_keys_skipped,
            "built reference index"
        );
        debug!(columns = ?columns, "retained reference columns");

        Ok(Self {
            columns,
            rows,
            by_key,
            duplicates_dropped,
            empty_keys_skipped,
        })
    }

    /// Output names of the retained columns, key column first.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Unique rows in first-occurrence order.
    pub fn rows(&self) -> &[ReferenceRow] {
        &self.rows
    }

    /// Unique normalized keys in first-occurrence order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(ReferenceRow::normalized_key)
    }

    /// Exact lookup of an already-normalized key. Empty keys never match.
    pub fn get(&self, normalized_key: &str) -> Option<&ReferenceRow> {
        if normalized_key.is_empty() {
            return None;
        }
        self.by_key.get(normalized_key).map(|&pos| &self.rows[pos])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Reference rows discarded because an earlier row had the same key.
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    /// Reference rows discarded because their key normalized to `""`.
    pub fn empty_keys_skipped(&self) -> usize {
        self.empty_keys_skipped
    }
}

/// Appends `suffix` to every name taken by the offer table, the reserved
/// result columns, or an earlier retained column. `suffix` must be non-empty.
fn rename_colliding(names: &[&str], offer_headers: &[String], suffix: &str) -> Vec<String> {
    let mut taken: Vec<String> = offer_headers.to_vec();
    taken.extend(RESERVED_COLUMNS.iter().map(|name| (*name).to_string()));

    let mut renamed = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = (*name).to_string();
        while taken.contains(&candidate) {
            candidate.push_str(suffix);
        }
        taken.push(candidate.clone());
        renamed.push(candidate);
    }
    renamed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::from_rows(
            headers.iter().map(|h| (*h).to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_keeps_first_duplicate() {
        let reference = table(
            &["code", "price"],
            &[&["AB 1", "10"], &["ab1", "20"], &["C2", "30"], &[" Ab1 ", "40"]],
        );
        let config = MatchConfig::new("code", "sku").with_extra_columns(["price"]);
        let index = ReferenceIndex::build(&reference, &config, &[]).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.duplicates_dropped(), 2);
        let row = index.get("ab1").unwrap();
        assert_eq!(row.values(), ["AB 1", "10"]);
        assert_eq!(row.source_row(), 0);
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["ab1", "c2"]);
    }

    #[test]
    fn test_punctuation_keeps_keys_distinct() {
        let reference = table(&["code"], &[&["AB-100"], &["ab100"], &["XZ-77"]]);
        let index =
            ReferenceIndex::build(&reference, &MatchConfig::new("code", "sku"), &[]).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.duplicates_dropped(), 0);
    }

    #[test]
    fn test_skips_empty_keys() {
        let reference = table(&["code"], &[&["  "], &[""], &["A"]]);
        let index =
            ReferenceIndex::build(&reference, &MatchConfig::new("code", "sku"), &[]).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.empty_keys_skipped(), 2);
        assert!(index.get("").is_none());
    }

    #[test]
    fn test_missing_columns() {
        let reference = table(&["code", "price"], &[]);
        let err = ReferenceIndex::build(&reference, &MatchConfig::new("sku", "sku"), &[])
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::MissingColumn {
                table: TableRole::Reference,
                column: "sku".to_string()
            }
        );

        let config = MatchConfig::new("code", "sku").with_extra_columns(["price", "weight"]);
        let err = ReferenceIndex::build(&reference, &config, &[]).unwrap_err();
        assert_eq!(
            err,
            MatchError::MissingColumn {
                table: TableRole::Reference,
                column: "weight".to_string()
            }
        );
    }

    #[test]
    fn test_renames_colliding_columns() {
        let reference = table(&["code", "name", "used_code"], &[&["a", "n", "u"]]);
        let config = MatchConfig::new("code", "code").with_extra_columns(["name", "used_code"]);
        let offer_headers = vec!["code".to_string(), "qty".to_string()];
        let index = ReferenceIndex::build(&reference, &config, &offer_headers).unwrap();
        assert_eq!(
            index.columns(),
            ["code (reference)", "name", "used_code (reference)"]
        );
    }

    #[test]
    fn test_key_column_not_repeated_in_extras() {
        let reference = table(&["code", "name"], &[&["a", "n"]]);
        let config = MatchConfig::new("code", "sku").with_extra_columns(["code", "name", "name"]);
        let index = ReferenceIndex::build(&reference, &config, &[]).unwrap();
        assert_eq!(index.columns(), ["code", "name"]);
        assert_eq!(index.rows()[0].values(), ["a", "n"]);
    }

    #[test]
    fn test_empty_rename_suffix_is_rejected() {
        let reference = table(&["Code", "Name"], &[&["a", "n"]]);
        let config = MatchConfig::new("Code", "Code")
            .with_extra_columns(["Name"])
            .with_rename_suffix("");
        let offer_headers = vec!["Code".to_string(), "Name".to_string()];
        assert_eq!(
            ReferenceIndex::build(&reference, &config, &offer_headers).unwrap_err(),
            MatchError::EmptyRenameSuffix
        );
    }

    #[test]
    fn test_rename_keeps_appending_until_unique() {
        let offer = vec!["code".to_string(), "code (reference)".to_string()];
        let renamed = rename_colliding(&["code"], &offer, " (reference)");
        assert_eq!(renamed, vec!["code (reference) (reference)"]);
    }
}
