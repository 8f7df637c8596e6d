//! Config and coefficient loading plus the three estimator commands.

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use serde_json::json;
use soc_config::Config;
use soc_core::{DriveCycle, EstimatorBuilder, ParameterBundle, Sample, SocEstimator, StartSocPolicy};

use crate::cli::{DEFAULT_CONFIG_PATH, DEFAULT_PARAMS_PATH};

/// Read, parse and validate the TOML config.
///
/// Returns `(config, loaded_from_file)`. Only the default path may be absent;
/// an explicit `--config` that cannot be read is an error.
pub fn load_config(path: &Path) -> Result<(Config, bool)> {
    if path == Path::new(DEFAULT_CONFIG_PATH) && !path.exists() {
        return Ok((Config::default(), false));
    }
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("invalid configuration: cannot read {}", path.display()))?;
    let cfg = soc_config::load_toml(&text)
        .map_err(|e| eyre::eyre!("invalid configuration in {}: {e}", path.display()))?;
    cfg.validate()
        .wrap_err_with(|| format!("invalid configuration in {}", path.display()))?;
    Ok((cfg, true))
}

/// Where to find the coefficient file.
///
/// `--params` is taken as given; a relative `[model].params` is resolved
/// against the config file's directory.
pub fn params_path(cli_params: Option<&Path>, cfg: &Config, config_path: &Path) -> PathBuf {
    if let Some(p) = cli_params {
        return p.to_path_buf();
    }
    match cfg.model.params.as_deref() {
        Some(p) if p.is_relative() => config_path
            .parent()
            .map_or_else(|| p.to_path_buf(), |dir| dir.join(p)),
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(DEFAULT_PARAMS_PATH),
    }
}

/// Load the coefficient file and validate it into a `ParameterBundle`.
pub fn load_bundle(path: &Path) -> Result<ParameterBundle> {
    let params = soc_config::load_model_params(path)?;
    let bundle = ParameterBundle::try_from(&params).map_err(|e| {
        eyre::Report::new(e).wrap_err(format!("model params {} rejected", path.display()))
    })?;
    for channel in bundle.degenerate_channels() {
        tracing::warn!(
            channel,
            path = %path.display(),
            "input range has zero width; normalization uses a small epsilon"
        );
    }
    tracing::info!(
        hidden = bundle.hidden_width(),
        path = %path.display(),
        "model parameters loaded"
    );
    Ok(bundle)
}

/// Assemble the estimator; `start_soc` pins the integrator seed when given.
pub fn build_estimator(
    cfg: &Config,
    bundle: ParameterBundle,
    start_soc: Option<f64>,
) -> Result<SocEstimator> {
    let mut builder = EstimatorBuilder::from_config(cfg);
    if let Some(pct) = start_soc {
        builder = builder.with_start_policy(StartSocPolicy::Fixed(pct));
    }
    builder.with_bundle(bundle).build()
}

/// Single-sample estimate. A failed computation is reported as `null`, not an error.
pub fn run_predict(est: &SocEstimator, sample: Sample, json_mode: bool) -> Result<()> {
    let soc = est.estimate_point_or_none(&sample);
    if json_mode {
        println!("{}", json!({ "soc": soc }));
    } else {
        match soc {
            Some(v) => println!("SOC: {v:.2} %"),
            None => println!("SOC: unavailable"),
        }
    }
    Ok(())
}

/// Trajectory estimate over a drive-cycle file.
pub fn run_simulate(est: &SocEstimator, input: &Path, json_mode: bool) -> Result<()> {
    let cycle: DriveCycle = soc_config::load_drive_cycle(input)?.into();
    tracing::debug!(
        current = cycle.current.len(),
        voltage = cycle.voltage.len(),
        temperature = cycle.temperature.len(),
        timed = cycle.time.is_some(),
        "drive cycle loaded"
    );

    let traj = est.simulate_or_empty(&cycle);
    if json_mode {
        println!(
            "{}",
            json!({
                "soc": traj.soc,
                "discharge_time": traj.discharge_time,
                "total_points": traj.total_points(),
            })
        );
        return Ok(());
    }

    println!("Points: {}", traj.total_points());
    match traj.discharge_time {
        Some(t) if traj.soc.last().is_some_and(|v| *v == 0.0) => {
            println!("Discharged at: {t:.1} s");
        }
        Some(t) => println!("End of cycle: {t:.1} s"),
        None => println!("Discharge time: n/a"),
    }
    match traj.soc.last() {
        Some(v) => println!("Final SOC: {v:.2} %"),
        None => println!("Final SOC: n/a"),
    }
    Ok(())
}

/// Report what was loaded without running an estimate.
pub fn run_check(
    est: &SocEstimator,
    params: &Path,
    config: Option<&Path>,
    json_mode: bool,
) -> Result<()> {
    let predictor = est.predictor();
    let bundle = predictor.bundle();
    let pack = est.pack();

    if json_mode {
        println!(
            "{}",
            json!({
                "params": params.display().to_string(),
                "config": config.map(|p| p.display().to_string()),
                "hidden_width": bundle.hidden_width(),
                "input_min": bundle.input_min(),
                "input_max": bundle.input_max(),
                "output_min": bundle.output_min(),
                "output_max": bundle.output_max(),
                "fractional_output": predictor.is_fractional(),
                "capacity_ah": pack.capacity_ah,
                "series_cells": pack.series_cells,
                "ml_weight": est.fusion().ml_weight(),
            })
        );
        return Ok(());
    }

    match config {
        Some(p) => println!("Config: {}", p.display()),
        None => println!("Config: built-in defaults"),
    }
    println!("Params: {}", params.display());
    println!("Hidden units: {}", bundle.hidden_width());
    let (lo, hi) = (bundle.input_min(), bundle.input_max());
    for (name, c) in [("current", 0), ("temperature", 1), ("cell voltage", 2)] {
        println!("  {name:<13} [{}, {}]", lo[c], hi[c]);
    }
    println!(
        "Output range: [{}, {}]{}",
        bundle.output_min(),
        bundle.output_max(),
        if predictor.is_fractional() { " (fraction, scaled to %)" } else { "" }
    );
    println!(
        "Pack: {} Ah, {} cells in series; ML weight {}",
        pack.capacity_ah,
        pack.series_cells,
        est.fusion().ml_weight()
    );
    println!("OK");
    Ok(())
}
