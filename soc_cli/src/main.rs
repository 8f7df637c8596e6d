#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cli;
mod error_fmt;
mod estimate;

use std::path::Path;

use clap::Parser;
use eyre::Result;
use soc_core::Sample;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    if let Err(e) = color_eyre::install() {
        eprintln!("warning: could not install error report handler: {e}");
    }
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let (cfg, from_file) = estimate::load_config(&cli.config)?;
    init_tracing(&cli, &cfg.logging)?;
    if !from_file {
        tracing::info!(path = %cli.config.display(), "config file not found; using defaults");
    }

    let params = estimate::params_path(cli.params.as_deref(), &cfg, &cli.config);
    let bundle = estimate::load_bundle(&params)?;

    match cli.cmd {
        Commands::Predict {
            current,
            voltage,
            temperature,
            time,
        } => {
            let est = estimate::build_estimator(&cfg, bundle, None)?;
            let mut sample = Sample::new(current, voltage, temperature);
            if let Some(t) = time {
                sample = sample.at(t);
            }
            estimate::run_predict(&est, sample, cli.json)
        }
        Commands::Simulate { input, start_soc } => {
            let est = estimate::build_estimator(&cfg, bundle, start_soc)?;
            estimate::run_simulate(&est, &input, cli.json)
        }
        Commands::Check => {
            let est = estimate::build_estimator(&cfg, bundle, None)?;
            let config = from_file.then_some(cli.config.as_path());
            estimate::run_check(&est, &params, config, cli.json)
        }
    }
}

/// Console layer on stderr (pretty or JSON), plus an optional JSON-lines file layer.
fn init_tracing(cli: &Cli, logging: &soc_config::Logging) -> Result<()> {
    let console_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    let console: Box<dyn Layer<Registry> + Send + Sync> = if cli.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    let file_layer = match logging.file.as_deref() {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("invalid configuration: logging.file {file:?} has no file name"))?;
            let appender = match logging.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            let level = EnvFilter::try_new(logging.level.as_deref().unwrap_or("info"))?;
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(level),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console.with_filter(console_filter))
        .with(file_layer)
        .try_init()?;
    Ok(())
}
