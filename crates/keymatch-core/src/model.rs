//! In-memory table model shared by ingest, engine and output.

use std::collections::BTreeSet;

use crate::error::{MatchError, Result};

/// Ordered rows of text cells under a header of unique column names.
///
/// Every row has exactly `headers().len()` cells: short rows are padded with
/// empty strings and long rows are truncated when pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table, rejecting repeated header names.
    pub fn new(headers: Vec<String>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for header in &headers {
            if !seen.insert(header.as_str()) {
                return Err(MatchError::DuplicateColumn {
                    column: header.clone(),
                });
            }
        }
        Ok(Self {
            headers,
            rows: Vec::new(),
        })
    }

    /// Create a table and push every row.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut table = Self::new(headers)?;
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row);
        }
        Ok(table)
    }

    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Copy of the table without the named columns; unknown names are ignored.
    pub fn without_columns(&self, names: &[&str]) -> Table {
        let keep: Vec<usize> = (0..self.headers.len())
            .filter(|&col| !names.contains(&self.headers[col].as_str()))
            .collect();
        Table {
            headers: keep.iter().map(|&col| self.headers[col].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| keep.iter().map(|&col| row[col].clone()).collect())
                .collect(),
        }
    }

    /// Cell text, or `""` when the coordinates are out of range.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map_or("", String::as_str)
    }
}
