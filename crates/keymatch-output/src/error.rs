use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while writing a matched table.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write workbook {path}: {source}")]
    Xlsx {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    /// The table is wider than a worksheet allows.
    #[error("table has {columns} columns, more than a worksheet can hold")]
    TooManyColumns { columns: usize },

    /// The table is longer than a worksheet allows.
    #[error("table has {rows} rows, more than a worksheet can hold")]
    TooManyRows { rows: usize },
}

pub type Result<T> = std::result::Result<T, OutputError>;
