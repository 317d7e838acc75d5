use std::path::Path;

use csv::ReaderBuilder;
use keymatch_core::Table;
use tracing::info;

use crate::error::{IngestError, Result};
use crate::header::{build_table, drop_blank_rows, normalize_cell};

/// Read a CSV file whose first non-blank record is the header.
pub fn read_csv_table(path: &Path) -> Result<Table> {
    let csv_error = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let records = reader
        .records()
        .map(|record| {
            record
                .map(|record| record.iter().map(normalize_cell).collect::<Vec<_>>())
                .map_err(csv_error)
        })
        .collect::<Result<Vec<_>>>()?;
    let (records, blank) = drop_blank_rows(records);
    info!(
        path = %path.display(),
        rows = records.len(),
        blank,
        "read csv"
    );
    build_table(path, records)
}
