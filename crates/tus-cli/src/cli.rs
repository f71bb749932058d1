//! CLI argument definitions for the survey harmonizer.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tus-harmonize",
    version,
    about = "Harmonize and link time-use survey modules into one table",
    long_about = "Read the household, person and activity modules of a time-use survey \
                  round, synthesize household and person identifiers, decode categorical \
                  codes, resolve districts and write one person-by-activity Parquet table."
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
    /// Harmonize a folder of survey module files.
    Run(RunArgs),

    /// List the built-in survey layouts.
    Layouts,

    /// List the built-in code maps.
    CodeMaps,
}

#[derive(Args)]
pub struct RunArgs {
    /// Folder holding the module CSV or Parquet files.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Output Parquet file (default: <INPUT_DIR>/individual_daily_schedule.parquet).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Folder for audit logs and diagnostics (default: <INPUT_DIR>/logs).
    #[arg(long = "logs-dir", value_name = "DIR")]
    pub logs_dir: Option<PathBuf>,

    /// Built-in layout preset.
    #[arg(long = "layout", default_value = "tus2019", conflicts_with = "layout_file")]
    pub layout: String,

    /// JSON layout file, used instead of a preset.
    #[arg(long = "layout-file", value_name = "FILE")]
    pub layout_file: Option<PathBuf>,

    /// Geographic reference CSV (Sub-region Code, District Code, State Code, ...).
    #[arg(long = "districts", value_name = "FILE")]
    pub districts: Option<PathBuf>,

    /// JSON file of code map overrides merged over the built-in maps.
    #[arg(long = "code-maps", value_name = "FILE")]
    pub code_maps: Option<PathBuf>,

    /// Infer CSV column types instead of reading every column as text.
    #[arg(long = "infer-types")]
    pub infer_types: bool,

    /// Rows scanned for type inference (only with --infer-types).
    #[arg(long = "infer-schema-length", value_name = "ROWS", requires = "infer_types")]
    pub infer_schema_length: Option<usize>,

    /// Prepare module groups on a worker pool.
    #[arg(long = "parallel")]
    pub parallel: bool,

    /// Upper bound on worker threads (only with --parallel).
    #[arg(long = "max-workers", value_name = "N", requires = "parallel")]
    pub max_workers: Option<usize>,
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
