//! Load, match and write: the work behind `keymatch match`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use keymatch_core::{MatchConfig, MatchObserver, Tier, match_tables_with_observer};
use keymatch_ingest::load_table;
use keymatch_output::{XlsxStyle, timestamped_output_path, write_csv, write_xlsx};
use tracing::{info, info_span};

/// File format of the written result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    /// `csv` for `.csv` paths, otherwise `xlsx`.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Xlsx,
        }
    }
}

/// Where the result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Exact file path.
    File(PathBuf),
    /// Directory receiving a `MATCHED_<timestamp>` file.
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub reference: PathBuf,
    pub offer: PathBuf,
    pub config: MatchConfig,
    pub target: OutputTarget,
    /// Explicit format; inferred from the target when `None`.
    pub format: Option<OutputFormat>,
}

/// Counts and paths reported after a run.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub reference: PathBuf,
    pub offer: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub reference_rows: usize,
    pub rows: usize,
    pub tier_counts: BTreeMap<Tier, usize>,
    pub unmatched: usize,
    pub elapsed: Duration,
}

impl MatchOutcome {
    pub fn matched(&self) -> usize {
        self.rows - self.unmatched
    }
}

/// Default output directory: next to the offer file.
pub fn default_output_dir(offer: &Path) -> PathBuf {
    match offer.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Final output path and format for a target.
pub fn resolve_output(
    target: &OutputTarget,
    format: Option<OutputFormat>,
) -> (PathBuf, OutputFormat) {
    match target {
        OutputTarget::File(path) => {
            let format = format.unwrap_or_else(|| OutputFormat::from_path(path));
            (path.clone(), format)
        }
        OutputTarget::Directory(dir) => {
            let format = format.unwrap_or(OutputFormat::Xlsx);
            (timestamped_output_path(dir, format.extension()), format)
        }
    }
}

pub fn run_match(request: &MatchRequest, observer: &dyn MatchObserver) -> Result<MatchOutcome> {
    let started = Instant::now();
    let span = info_span!("run", offer = %request.offer.display());
    let _guard = span.enter();

    let reference = load_table(&request.reference)
        .with_context(|| format!("load reference table: {}", request.reference.display()))?;
    let offer = load_table(&request.offer)
        .with_context(|| format!("load offer table: {}", request.offer.display()))?;

    let (table, unmatched) =
        match_tables_with_observer(&reference, &offer, &request.config, observer)
            .context("match offer rows")?;

    let (output, format) = resolve_output(&request.target, request.format);
    if let Some(parent) = output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output directory: {}", parent.display()))?;
    }
    match format {
        OutputFormat::Xlsx => write_xlsx(&table, &output, &XlsxStyle::default()),
        OutputFormat::Csv => write_csv(&table, &output),
    }
    .with_context(|| format!("write result: {}", output.display()))?;

    info!(output = %output.display(), unmatched, "run complete");
    Ok(MatchOutcome {
        reference: request.reference.clone(),
        offer: request.offer.clone(),
        output,
        format,
        reference_rows: reference.len(),
        rows: table.len(),
        tier_counts: table.tier_counts(),
        unmatched,
        elapsed: started.elapsed(),
    })
}
