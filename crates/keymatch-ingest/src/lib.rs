//! Loading reference and offer tables from CSV files and spreadsheets.
//!
//! Every cell is read as text so product codes such as `01234` survive
//! untouched. Headers are trimmed, blank headers become `Unnamed: <n>`, and
//! repeated headers get a numeric suffix.

mod csv_table;
mod error;
mod header;
mod workbook;

use std::path::Path;

use keymatch_core::Table;
use tracing::info;

pub use csv_table::read_csv_table;
pub use error::{IngestError, Result};
pub use workbook::read_workbook_table;

/// File formats understood by [`load_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

/// Load a table, choosing the reader by file extension.
pub fn load_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let table = match SourceFormat::from_path(path)? {
        SourceFormat::Csv => read_csv_table(path)?,
        SourceFormat::Workbook => read_workbook_table(path)?,
    };
    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers().len(),
        "loaded table"
    );
    Ok(table)
}

/// Header names of a file, in column order.
pub fn list_columns(path: &Path) -> Result<Vec<String>> {
    Ok(load_table(path)?.headers().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            SourceFormat::from_path(Path::new("a/B.CSV")).unwrap(),
            SourceFormat::Csv
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("offer.xlsx")).unwrap(),
            SourceFormat::Workbook
        );
        assert!(matches!(
            SourceFormat::from_path(Path::new("notes")),
            Err(IngestError::UnsupportedFormat { extension, .. }) if extension.is_empty()
        ));
    }
}
