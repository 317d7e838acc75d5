//! Turning raw records into a [`Table`].

use std::collections::BTreeSet;
use std::path::Path;

use keymatch_core::Table;
use tracing::debug;

use crate::error::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips a byte-order mark; all other whitespace is kept since keys are
/// compared after normalization and written back verbatim.
pub(crate) fn normalize_cell(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').to_string()
}

/// Blank headers become `Unnamed: <n>`; repeated headers get `.1`, `.2`, ...
fn unique_headers(raw: &[String]) -> Vec<String> {
    let mut taken = BTreeSet::new();
    let mut headers = Vec::with_capacity(raw.len());
    for (position, value) in raw.iter().enumerate() {
        let base = match normalize_header(value) {
            name if name.is_empty() => format!("Unnamed: {position}"),
            name => name,
        };
        let mut candidate = base.clone();
        let mut suffix = 1usize;
        while taken.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        if candidate != base {
            debug!(header = %base, renamed = %candidate, "renamed duplicate header");
        }
        taken.insert(candidate.clone());
        headers.push(candidate);
    }
    headers
}

/// Remove records whose cells are all blank; returns the kept records and
/// how many were dropped.
pub(crate) fn drop_blank_rows(records: Vec<Vec<String>>) -> (Vec<Vec<String>>, usize) {
    let total = records.len();
    let kept: Vec<Vec<String>> = records
        .into_iter()
        .filter(|row| row.iter().any(|value| !value.trim().is_empty()))
        .collect();
    let blank = total - kept.len();
    (kept, blank)
}

/// First record is the header; the rest are data rows.
pub(crate) fn build_table(path: &Path, mut records: Vec<Vec<String>>) -> Result<Table> {
    if records.is_empty() {
        return Ok(Table::default());
    }
    let header = records.remove(0);
    Table::from_rows(unique_headers(&header), records).map_err(|source| IngestError::Table {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn test_unique_headers() {
        let headers = unique_headers(&strings(&["\u{feff}Code", " Name  x ", "", "Code", "Code"]));
        assert_eq!(
            headers,
            strings(&["Code", "Name x", "Unnamed: 2", "Code.1", "Code.2"])
        );
    }

    #[test]
    fn test_cells_keep_whitespace() {
        assert_eq!(normalize_cell("\u{feff} AB 1 "), " AB 1 ");
    }

    #[test]
    fn test_blank_rows_are_counted() {
        let (kept, blank) = drop_blank_rows(vec![
            strings(&["a", "b"]),
            strings(&["", " "]),
            Vec::new(),
            strings(&["", "2"]),
        ]);
        assert_eq!(kept, [strings(&["a", "b"]), strings(&["", "2"])]);
        assert_eq!(blank, 2);
    }

    #[test]
    fn test_build_table_splits_header() {
        let table = build_table(
            Path::new("t.csv"),
            vec![strings(&["a", "b"]), strings(&["1", "2"])],
        )
        .unwrap();
        assert_eq!(table.headers(), ["a", "b"]);
        assert_eq!(table.rows(), [strings(&["1", "2"])]);
    }
}
