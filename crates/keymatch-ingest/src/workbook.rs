//! Spreadsheet reading through calamine.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use keymatch_core::Table;
use tracing::info;

use crate::error::{IngestError, Result};
use crate::header::{build_table, drop_blank_rows};

/// Render a cell as the text a user would see for a plain value.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim_start_matches('\u{feff}').to_string(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => float_text(*value),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => float_text(value.as_f64()),
        Data::DateTimeIso(value) | Data::DurationIso(value) => value.clone(),
        Data::Error(value) => value.to_string(),
    }
}

// Codes like 1234 are stored as floats; they must not come back as "1234.0".
fn float_text(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Read the first worksheet; its first non-blank row is the header.
pub fn read_workbook_table(path: &Path) -> Result<Table> {
    let workbook_error = |message: String| IngestError::Workbook {
        path: path.to_path_buf(),
        message,
    };
    let mut workbook = open_workbook_auto(path).map_err(|err| workbook_error(err.to_string()))?;
    let sheet_name = workbook.sheet_names().first().cloned();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|err| workbook_error(err.to_string()))?;

    let (records, blank) = drop_blank_rows(
        range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect(),
    );
    info!(
        path = %path.display(),
        sheet = sheet_name.as_deref().unwrap_or(""),
        rows = records.len(),
        blank,
        "read worksheet"
    );
    build_table(path, records)
}
