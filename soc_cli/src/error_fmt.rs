//! Human-readable error descriptions and structured JSON error formatting.

use soc_core::error::{BuildError, BundleError};

/// Exit code when the model cannot be loaded (missing, unreadable or malformed coefficients).
pub const EXIT_STARTUP: i32 = 3;
/// Exit code for configuration problems.
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for everything else.
pub const EXIT_OTHER: i32 = 1;

/// The full context chain, outermost first, joined with ": ".
fn chain_text(err: &eyre::Report) -> String {
    err.chain()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

fn is_params_failure(lower: &str) -> bool {
    lower.contains("model params")
}

fn is_config_failure(lower: &str) -> bool {
    lower.contains("invalid configuration")
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BundleError>() {
        let hint = match be {
            BundleError::InvertedInputRange { .. } | BundleError::InvertedOutputRange { .. } => {
                "x_min/x_max or y_min/y_max were swapped when exporting"
            }
            BundleError::NonFinite(_) | BundleError::UnboundedRange { .. } => {
                "the training run diverged or the export wrote NaN, Infinity or near-overflow bounds"
            }
            _ => "the weights were exported from a different network shape (inputs must be current, temperature, cell voltage)",
        };
        return format!(
            "What happened: The model coefficient file is structurally invalid ({be}).\nLikely causes: {hint}.\nHow to fix: Re-export IW, LW, b1, b2, x_min, x_max, y_min, y_max from the trained model and rerun `soc check`."
        );
    }

    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingBundle => {
                "What happened: No parameter bundle was provided to the estimator.\nLikely causes: The coefficient file was not loaded before building.\nHow to fix: Pass --params or set [model].params in the config.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML or on the command line (e.g. --start-soc).\nHow to fix: Edit the config file or flags, then rerun."
            ),
        };
    }

    // String-based heuristics for errors coming from startup I/O
    let msg = chain_text(err);
    let lower = msg.to_ascii_lowercase();

    if lower.contains("open model params") {
        return format!(
            "What happened: The model coefficient file could not be opened.\nLikely causes: Wrong path, or the file was never exported.\nHow to fix: Pass --params FILE or set [model].params in the config. Original: {msg}"
        );
    }

    if lower.contains("parse model params") {
        return format!(
            "What happened: The model coefficient file is not valid JSON for this model.\nLikely causes: Truncated file, or missing keys (IW, LW, b1, b2, x_min, x_max, y_min, y_max).\nHow to fix: Re-export the coefficients. Original: {msg}"
        );
    }

    if is_config_failure(&lower) {
        return format!(
            "What happened: Configuration is invalid or unreadable.\nLikely causes: Out-of-range values in [pack], [fusion], [predictor] or [physics], or a TOML syntax error.\nHow to fix: Edit the TOML config and try again. Original: {msg}"
        );
    }

    // Drive cycle CSV header special-case
    if lower.contains("drive cycle csv must have headers") {
        return "Invalid headers in drive cycle CSV. Expected 'current,voltage,temperature[,time]'."
            .to_string();
    }

    // Generic fallback
    format!(
        "Something went wrong.\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 for model loading, 2 for configuration, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BundleError>().is_some() {
        return EXIT_STARTUP;
    }
    if let Some(BuildError::InvalidConfig(_)) = err.downcast_ref::<BuildError>() {
        return EXIT_CONFIG;
    }
    let lower = chain_text(err).to_ascii_lowercase();
    if is_params_failure(&lower) {
        EXIT_STARTUP
    } else if is_config_failure(&lower) {
        EXIT_CONFIG
    } else {
        EXIT_OTHER
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    match exit_code_for_error(err) {
        EXIT_STARTUP => "InvalidParams",
        EXIT_CONFIG => "InvalidConfig",
        _ => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
