//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use ksp_cli::commands::DEFAULT_STORE_PATH;
use ksp_serve::DEFAULT_MODEL_PATH;
use ksp_train::{DEFAULT_NEIGHBORS, DEFAULT_SEED, DEFAULT_TEST_FRACTION};

#[derive(Parser)]
#[command(
    name = "ksp",
    version,
    about = "Kickstarter success prediction - ingest, train and serve",
    long_about = "Predict whether a Kickstarter campaign will succeed.\n\n\
                  Normalizes raw Kickstarter exports into a campaign store, trains a\n\
                  nearest-neighbour model on it and serves predictions over HTTP."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
    /// Normalize raw Kickstarter CSV exports into the campaign store.
    Ingest(IngestArgs),

    /// Train the success model and write the artifact.
    Train(TrainArgs),

    /// Predict one campaign from the command line.
    Predict(PredictArgs),

    /// Serve predictions over HTTP.
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct IngestArgs {
    /// Folder holding Kickstarter.csv, Kickstarter001.csv, ...
    #[arg(value_name = "RAW_DIR")]
    pub raw_dir: PathBuf,

    /// Campaign store CSV to write.
    #[arg(long = "store", value_name = "PATH", default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,

    /// Append to the store instead of replacing it.
    #[arg(long = "append")]
    pub append: bool,
}

#[derive(Args)]
pub struct TrainArgs {
    /// Campaign store CSV to train from.
    #[arg(long = "store", value_name = "PATH", default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,

    /// Train straight from raw exports instead of the store.
    #[arg(long = "raw-dir", value_name = "DIR")]
    pub raw_dir: Option<PathBuf>,

    /// Where to write the model artifact.
    #[arg(long = "model", value_name = "PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// Seed for the train/test shuffle.
    #[arg(long = "seed", default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Share of rows held out for evaluation.
    #[arg(long = "test-fraction", default_value_t = DEFAULT_TEST_FRACTION)]
    pub test_fraction: f64,

    /// Neighbours consulted per prediction.
    #[arg(short = 'k', long = "neighbors", default_value_t = DEFAULT_NEIGHBORS)]
    pub neighbors: usize,
}

#[derive(Args)]
pub struct PredictArgs {
    /// Model artifact to load.
    #[arg(long = "model", value_name = "PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    #[arg(long = "parent-category")]
    pub parent_category: String,

    /// Sub-category, or "None" when the campaign has none.
    #[arg(long = "sub-category", default_value = "None")]
    pub sub_category: String,

    /// Campaign length in days.
    #[arg(long = "days")]
    pub days: u32,

    #[arg(long = "backers", default_value_t = 0)]
    pub backers_count: u64,

    /// Amount pledged in the campaign currency.
    #[arg(long = "pledged", default_value_t = 0.0)]
    pub pledged_amt: f64,

    /// Amount pledged in USD. Defaults to --pledged.
    #[arg(long = "converted-pledged")]
    pub converted_pledged_amt: Option<f64>,

    #[arg(long = "goal")]
    pub goal: f64,

    /// Two-letter country code, e.g. US.
    #[arg(long = "country")]
    pub country: String,
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long = "host", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long = "port", default_value_t = 8000)]
    pub port: u16,

    /// Model artifact to serve.
    #[arg(long = "model", value_name = "PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,
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
