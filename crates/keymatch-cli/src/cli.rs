//! CLI argument definitions for keymatch.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use keymatch_cli::pipeline::OutputFormat;

#[derive(Parser)]
#[command(
    name = "keymatch",
    version,
    about = "Match offer rows to a reference table by product code",
    long_about = "Match offer rows to a reference table by product code.\n\n\
                  Keys are compared without whitespace or case. Rows that miss an exact\n\
                  match try a leading-zero fix, prefix containment and fuzzy similarity."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Match an offer table against a reference table and write the result.
    Match(MatchArgs),

    /// Print the column names of a CSV file or spreadsheet.
    Columns(ColumnsArgs),
}

#[derive(Parser)]
pub struct MatchArgs {
    /// Reference table (CSV or spreadsheet).
    #[arg(value_name = "REFERENCE")]
    pub reference: PathBuf,

    /// Offer table (CSV or spreadsheet).
    #[arg(value_name = "OFFER")]
    pub offer: PathBuf,

    /// Key column in the reference table.
    #[arg(long = "reference-key", value_name = "COLUMN")]
    pub reference_key: Option<String>,

    /// Key column in the offer table.
    #[arg(long = "offer-key", value_name = "COLUMN")]
    pub offer_key: Option<String>,

    /// Reference column to copy into matched rows (repeatable).
    #[arg(long = "extra", value_name = "COLUMN")]
    pub extra: Vec<String>,

    /// Minimum fuzzy similarity score, 0 to 100.
    #[arg(long = "threshold", value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Text written into reference columns of unmatched rows.
    #[arg(long = "no-match-marker", value_name = "TEXT")]
    pub no_match_marker: Option<String>,

    /// Suffix for reference columns whose names collide with offer columns.
    #[arg(long = "rename-suffix", value_name = "TEXT")]
    pub rename_suffix: Option<String>,

    /// TOML profile with match settings; flags take precedence.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output file path.
    #[arg(long = "output", short = 'o', value_name = "PATH", conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Directory for a timestamped output file (default: the offer's directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format (default: from --output extension, else xlsx).
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormatArg>,

    /// Hide the progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

#[derive(Parser)]
pub struct ColumnsArgs {
    /// CSV file or spreadsheet to inspect.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Xlsx,
    Csv,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Xlsx => Self::Xlsx,
            OutputFormatArg::Csv => Self::Csv,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
