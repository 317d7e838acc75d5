use std::io::Write;
use std::path::Path;

use csv::Writer;
use keymatch_core::MatchedTable;
use tracing::info;

use crate::error::{OutputError, Result};

/// Write the header and one record per row, `matched` as `true`/`false`.
pub fn write_csv_to<W: Write>(table: &MatchedTable, writer: W) -> csv::Result<()> {
    let mut writer = Writer::from_writer(writer);
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.record())?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the table as CSV text.
pub fn render_csv(table: &MatchedTable) -> csv::Result<String> {
    let mut buffer = Vec::new();
    write_csv_to(table, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn write_csv(table: &MatchedTable, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv_to(table, file).map_err(|source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = table.len(), "wrote csv");
    Ok(())
}
