use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use keymatch_cli::pipeline::{
    MatchOutcome, MatchRequest, OutputTarget, default_output_dir, run_match as run_pipeline,
};
use keymatch_cli::profile::{ConfigOverrides, resolve_config};
use keymatch_ingest::load_table;

use crate::cli::{ColumnsArgs, MatchArgs};
use crate::progress::ProgressObserver;
use crate::summary::apply_table_style;

pub fn run_match(args: &MatchArgs) -> Result<MatchOutcome> {
    let overrides = ConfigOverrides {
        reference_key: args.reference_key.clone(),
        offer_key: args.offer_key.clone(),
        extra_columns: args.extra.clone(),
        fuzzy_threshold: args.threshold,
        no_match_marker: args.no_match_marker.clone(),
        rename_suffix: args.rename_suffix.clone(),
    };
    let config = resolve_config(args.config.as_deref(), overrides)?;

    let target = match (&args.output, &args.output_dir) {
        (Some(path), _) => OutputTarget::File(path.clone()),
        (None, Some(dir)) => OutputTarget::Directory(dir.clone()),
        (None, None) => OutputTarget::Directory(default_output_dir(&args.offer)),
    };
    let request = MatchRequest {
        reference: args.reference.clone(),
        offer: args.offer.clone(),
        config,
        target,
        format: args.format.map(Into::into),
    };

    let observer = ProgressObserver::new(!args.no_progress && io::stderr().is_terminal());
    let outcome = run_pipeline(&request, &observer);
    observer.finish();
    outcome
}

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    let loaded = load_table(&args.file)
        .with_context(|| format!("read columns: {}", args.file.display()))?;
    println!("{}", describe_columns(&args.file, &loaded));
    Ok(())
}

/// Row and column counts followed by the numbered header listing.
fn describe_columns(path: &Path, loaded: &keymatch_core::Table) -> String {
    let mut listing = Table::new();
    listing.set_header(vec!["#", "Column"]);
    apply_table_style(&mut listing);
    for (position, name) in loaded.headers().iter().enumerate() {
        listing.add_row(vec![(position + 1).to_string(), name.clone()]);
    }
    format!(
        "File: {}\nRows: {}\nColumns: {}\n{listing}",
        path.display(),
        loaded.len(),
        loaded.headers().len()
    )
}
