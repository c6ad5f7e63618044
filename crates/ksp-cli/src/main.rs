//! Kickstarter success prediction CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use ksp_cli::commands::{TrainingSource, run_ingest, run_predict, run_serve, run_train};
use ksp_cli::logging::{LogConfig, LogFormat, init_logging};
use ksp_model::CampaignFeatures;
use ksp_serve::ServeConfig;
use ksp_train::TrainingOptions;
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, PredictArgs, TrainArgs};
use crate::summary::{print_ingest_summary, print_prediction, print_train_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let result = match cli.command {
        Command::Ingest(args) => {
            run_ingest(&args.raw_dir, &args.store, args.append).map(|report| {
                print_ingest_summary(&report);
            })
        }
        Command::Train(args) => {
            let source = training_source(&args);
            run_train(&source, &args.model, &training_options(&args)).map(|report| {
                print_train_summary(&report);
            })
        }
        Command::Predict(args) => run_predict(&args.model, &features_from_args(&args))
            .map(print_prediction),
        Command::Serve(args) => run_serve(ServeConfig {
            host: args.host,
            port: args.port,
            model_path: args.model,
        }),
    };

    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn training_source(args: &TrainArgs) -> TrainingSource {
    match &args.raw_dir {
        Some(dir) => TrainingSource::RawDir(dir.clone()),
        None => TrainingSource::Store(args.store.clone()),
    }
}

fn training_options(args: &TrainArgs) -> TrainingOptions {
    TrainingOptions::new()
        .with_seed(args.seed)
        .with_test_fraction(args.test_fraction)
        .with_neighbors(args.neighbors)
}

fn features_from_args(args: &PredictArgs) -> CampaignFeatures {
    CampaignFeatures {
        parent_category: args.parent_category.clone(),
        sub_category: args.sub_category.clone(),
        days: args.days,
        backers_count: args.backers_count,
        pledged_amt: args.pledged_amt,
        converted_pledged_amt: args.converted_pledged_amt.unwrap_or(args.pledged_amt),
        goal: args.goal,
        country: args.country.clone(),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
