//! Subscriber setup for the `ksp` binary.
//!
//! Workspace crates log at the level chosen on the command line; everything
//! else stays at `warn` unless `RUST_LOG` says otherwise. The HTTP access
//! log from actix's `Logger` middleware follows the workspace level.
//!
//! ```ignore
//! use ksp_cli::logging::{LogConfig, init_logging};
//!
//! init_logging(&LogConfig::default())?;
//! ```

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Targets that follow the configured level.
const CRATES: [&str; 6] = [
    "ksp_cli",
    "ksp_ingest",
    "ksp_model",
    "ksp_normalize",
    "ksp_serve",
    "ksp_train",
];

/// Access log target of the actix `Logger` middleware.
const HTTP_ACCESS_TARGET: &str = "actix_web::middleware::logger";

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace the computed directives when it is set.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    pub with_target: bool,
    /// Emit an event when a stage span (`ingest`, `train`) closes.
    pub with_spans: bool,
    pub with_ansi: bool,
    pub with_http_access: bool,
    pub format: LogFormat,
    /// Append to this file instead of writing to stderr.
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    /// One JSON object per line.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::INFO,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_spans: true,
            with_ansi: true,
            with_http_access: true,
            format: LogFormat::Pretty,
            log_file: None,
        }
    }
}

impl LogConfig {
    /// Directive string for the configured level.
    pub fn directives(&self) -> String {
        let level = self.level_filter.to_string().to_lowercase();
        let mut directives = vec!["warn".to_string()];
        directives.extend(CRATES.iter().map(|krate| format!("{krate}={level}")));
        if self.with_http_access {
            directives.push(format!("{HTTP_ACCESS_TARGET}={level}"));
        }
        directives.join(",")
    }

    fn env_filter(&self) -> EnvFilter {
        if self.use_env_filter {
            if let Ok(filter) = EnvFilter::try_from_default_env() {
                return filter;
            }
        }
        EnvFilter::new(self.directives())
    }

    fn span_events(&self) -> FmtSpan {
        if self.with_spans {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Install the global subscriber. Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let writer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };
    tracing_subscriber::registry()
        .with(output_layer(config, writer))
        .with(config.env_filter())
        .init();
    Ok(())
}

/// Build the formatting layer for `config`, writing to `writer`.
pub fn output_layer(
    config: &LogConfig,
    writer: BoxMakeWriter,
) -> Box<dyn Layer<Registry> + Send + Sync> {
    // A log file never gets escape codes.
    let ansi = config.with_ansi && config.log_file.is_none();
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target)
        .with_span_events(config.span_events());

    match (config.format, config.with_timestamps) {
        (LogFormat::Json, _) => base.json().boxed(),
        (LogFormat::Compact, true) => base.compact().with_ansi(ansi).boxed(),
        (LogFormat::Compact, false) => base.compact().with_ansi(ansi).without_time().boxed(),
        (LogFormat::Pretty, true) => base.with_ansi(ansi).boxed(),
        (LogFormat::Pretty, false) => base.with_ansi(ansi).without_time().boxed(),
    }
}
