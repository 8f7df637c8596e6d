//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config path used when `--config` is not given; a missing file here means defaults.
pub const DEFAULT_CONFIG_PATH: &str = "etc/soc_config.toml";
/// Coefficient file used when neither `--params` nor `[model].params` is set.
pub const DEFAULT_PARAMS_PATH: &str = "model_params.json";

#[derive(Parser, Debug)]
#[command(name = "soc", version, about = "Battery state-of-charge estimator")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Model coefficient file (JSON); overrides [model].params
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Print results and errors as JSON, log as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate SOC for a single measurement
    Predict {
        /// Pack current in amps (sign as measured)
        #[arg(long, allow_negative_numbers = true)]
        current: f64,
        /// Pack voltage in volts
        #[arg(long, allow_negative_numbers = true)]
        voltage: f64,
        /// Temperature in degrees Celsius
        #[arg(long, allow_negative_numbers = true)]
        temperature: f64,
        /// Timestamp in seconds (informational)
        #[arg(long, value_name = "SECS")]
        time: Option<f64>,
    },
    /// Estimate an SOC trajectory over a drive cycle
    Simulate {
        /// Drive cycle file: `.json` request shape or CSV `current,voltage,temperature[,time]`
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Pin the integrator's starting SOC (percent) instead of the configured policy
        #[arg(long, value_name = "PCT")]
        start_soc: Option<f64>,
    },
    /// Load config and coefficients, then report what was loaded
    Check,
}
