//! Writing matched tables to disk.
//!
//! - **CSV**: every column including the `matched` flag
//! - **XLSX**: offer columns plus a colour-coded block of appended columns

mod csv_output;
mod error;
mod xlsx;

use std::path::{Path, PathBuf};

use chrono::Local;

pub use csv_output::{render_csv, write_csv, write_csv_to};
pub use error::{OutputError, Result};
pub use xlsx::{XlsxStyle, write_xlsx};

/// `MATCHED_<YYYYmmdd_HHMMSS_ffffff>.<extension>` inside `dir`.
pub fn timestamped_output_path(dir: &Path, extension: &str) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S_%6f");
    dir.join(format!("MATCHED_{stamp}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamped_output_path_shape() {
        let path = timestamped_output_path(Path::new("out"), "xlsx");
        assert_eq!(path.parent(), Some(Path::new("out")));
        let name = path.file_name().and_then(|n| n.to_str()).unwrap();
        assert!(name.starts_with("MATCHED_"));
        assert!(name.ends_with(".xlsx"));
        let stamp = &name["MATCHED_".len()..name.len() - ".xlsx".len()];
        let parts: Vec<&str> = stamp.split('_').collect();
        assert_eq!(
            parts.iter().map(|part| part.len()).collect::<Vec<_>>(),
            vec![8, 6, 6]
        );
        assert!(stamp.chars().all(|ch| ch.is_ascii_digit() || ch == '_'));
    }
}
