#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas, parameter-bundle files and drive-cycle loaders for the SOC estimator.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - `ModelParams` mirrors the exported coefficient file (JSON); shapes are
//!   checked later, when the core builds its `ParameterBundle`.
//! - Drive-cycle loaders accept a strict-header CSV or the JSON request shape.
use serde::Deserialize;
use serde::de::{self, Deserializer};
use std::path::{Path, PathBuf};

/// How the current channel enters the charge integral.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CurrentSign {
    /// Use the sample current as-is: SOC moves by `+I*dt`.
    #[default]
    AsMeasured,
    /// Sources that report discharge as positive current; the integral uses `-I*dt`.
    DischargePositive,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PackCfg {
    /// Rated capacity in amp-hours
    pub capacity_ah: f64,
    /// Number of series cells; cell voltage = pack voltage / series_cells
    pub series_cells: u32,
    pub current_sign: CurrentSign,
}

impl Default for PackCfg {
    fn default() -> Self {
        Self {
            capacity_ah: 27.0,
            series_cells: 96,
            current_sign: CurrentSign::AsMeasured,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FusionCfg {
    /// Share of the neural estimate in the fused output (0.0..=1.0)
    pub ml_weight: f64,
}

impl Default for FusionCfg {
    fn default() -> Self {
        Self { ml_weight: 0.35 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PredictorCfg {
    /// Output ranges with `y_max` below this are fractions and get scaled to percent
    pub fraction_scale_threshold: f64,
    /// Denominator used for channels whose normalization range is zero-width
    pub degenerate_range_eps: f64,
}

impl Default for PredictorCfg {
    fn default() -> Self {
        Self {
            fraction_scale_threshold: 2.0,
            degenerate_range_eps: 1e-9,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StartSoc {
    /// Seed the integrator with the first neural estimate (fixed value if out of range)
    #[default]
    FirstNeural,
    /// Always seed with `fixed_start_soc`
    Fixed,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PhysicsCfg {
    pub start_soc: StartSoc,
    /// Seed used by `fixed`, and the fallback for `first_neural`
    pub fixed_start_soc: f64,
}

impl Default for PhysicsCfg {
    fn default() -> Self {
        Self {
            start_soc: StartSoc::FirstNeural,
            fixed_start_soc: 100.0,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ModelCfg {
    /// Path to the coefficient file (JSON)
    pub params: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub pack: PackCfg,
    pub fusion: FusionCfg,
    pub predictor: PredictorCfg,
    pub physics: PhysicsCfg,
    pub model: ModelCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Pack
        if !(self.pack.capacity_ah.is_finite() && self.pack.capacity_ah > 0.0) {
            eyre::bail!("pack.capacity_ah must be > 0");
        }
        if self.pack.series_cells == 0 {
            eyre::bail!("pack.series_cells must be >= 1");
        }

        // Fusion
        if !(0.0..=1.0).contains(&self.fusion.ml_weight) {
            eyre::bail!("fusion.ml_weight must be in [0.0, 1.0]");
        }

        // Predictor
        let thr = self.predictor.fraction_scale_threshold;
        if !(thr.is_finite() && thr > 0.0) {
            eyre::bail!("predictor.fraction_scale_threshold must be > 0");
        }
        let eps = self.predictor.degenerate_range_eps;
        if !(eps > 0.0 && eps < 1.0) {
            eyre::bail!("predictor.degenerate_range_eps must be in (0.0, 1.0)");
        }

        // Physics
        if !(0.0..=100.0).contains(&self.physics.fixed_start_soc) {
            eyre::bail!("physics.fixed_start_soc must be in [0.0, 100.0]");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
        }

        Ok(())
    }
}

// ── Coefficient file ─────────────────────────────────────────────────────────

/// Exported network coefficients and scaling bounds.
///
/// Key names follow the training export: `IW` (hidden x 3), `LW` (1 x hidden),
/// `b1`, `b2`, `x_min`/`x_max` (current, temperature, cell voltage) and
/// `y_min`/`y_max`. Vectors may be flat or column-shaped (`[[a], [b]]`).
#[derive(Debug, Deserialize, Clone)]
pub struct ModelParams {
    #[serde(rename = "IW", deserialize_with = "de_matrix")]
    pub input_weights: Vec<Vec<f64>>,
    #[serde(rename = "LW", deserialize_with = "de_flat")]
    pub output_weights: Vec<f64>,
    #[serde(rename = "b1", deserialize_with = "de_flat")]
    pub hidden_bias: Vec<f64>,
    #[serde(rename = "b2", deserialize_with = "de_scalar")]
    pub output_bias: f64,
    #[serde(deserialize_with = "de_flat")]
    pub x_min: Vec<f64>,
    #[serde(deserialize_with = "de_flat")]
    pub x_max: Vec<f64>,
    #[serde(deserialize_with = "de_scalar")]
    pub y_min: f64,
    #[serde(deserialize_with = "de_scalar")]
    pub y_max: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Scalar(f64),
    List(Vec<Numeric>),
}

impl Numeric {
    fn flatten_into(self, out: &mut Vec<f64>) {
        match self {
            Numeric::Scalar(v) => out.push(v),
            Numeric::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }

    fn flatten(self) -> Vec<f64> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }
}

fn de_flat<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Numeric::deserialize(deserializer)?.flatten())
}

fn de_scalar<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Numeric::deserialize(deserializer)?.flatten();
    match values.as_slice() {
        [v] => Ok(*v),
        other => Err(de::Error::custom(format!(
            "expected a single number, got {} values",
            other.len()
        ))),
    }
}

fn de_matrix<'de, D>(deserializer: D) -> Result<Vec<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Numeric::deserialize(deserializer)? {
        Numeric::Scalar(_) => Err(de::Error::custom("expected a matrix, got a number")),
        Numeric::List(rows) => {
            // A flat list is a single row
            if rows.iter().all(|r| matches!(r, Numeric::Scalar(_))) {
                return Ok(vec![Numeric::List(rows).flatten()]);
            }
            Ok(rows.into_iter().map(Numeric::flatten).collect())
        }
    }
}

pub fn parse_model_params(s: &str) -> Result<ModelParams, serde_json::Error> {
    serde_json::from_str::<ModelParams>(s)
}

pub fn load_model_params(path: &Path) -> eyre::Result<ModelParams> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("open model params {:?}: {}", path, e))?;
    parse_model_params(&text).map_err(|e| eyre::eyre!("parse model params {:?}: {}", path, e))
}

// ── Drive cycles ─────────────────────────────────────────────────────────────

/// Drive-cycle CSV schema.
///
/// Expected headers:
/// current,voltage,temperature[,time]
///
/// Example:
/// current,voltage,temperature,time
/// -12.5,352.1,24.0,0
/// -12.7,351.9,24.1,1
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct DriveCycleRow {
    pub current: f64,
    pub voltage: f64,
    pub temperature: f64,
    #[serde(default)]
    pub time: Option<f64>,
}

/// Channel arrays of one trajectory request. Lengths are not checked here;
/// the estimator owns that contract.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DriveCycleRecord {
    pub current: Vec<f64>,
    pub voltage: Vec<f64>,
    pub temperature: Vec<f64>,
    #[serde(default)]
    pub time: Option<Vec<f64>>,
}

impl DriveCycleRecord {
    /// Columnize rows. The time column is kept only when every row has one.
    pub fn from_rows(rows: &[DriveCycleRow]) -> Self {
        let time: Option<Vec<f64>> = rows.iter().map(|r| r.time).collect();
        Self {
            current: rows.iter().map(|r| r.current).collect(),
            voltage: rows.iter().map(|r| r.voltage).collect(),
            temperature: rows.iter().map(|r| r.temperature).collect(),
            time: time.filter(|t| !t.is_empty()),
        }
    }
}

pub fn load_drive_cycle_csv(path: &Path) -> eyre::Result<DriveCycleRecord> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open drive cycle CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    let with_time = ["current", "voltage", "temperature", "time"];
    if actual != with_time[..3] && actual != with_time {
        eyre::bail!(
            "drive cycle CSV must have headers 'current,voltage,temperature[,time]', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<DriveCycleRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    Ok(DriveCycleRecord::from_rows(&rows))
}

pub fn load_drive_cycle_json(path: &Path) -> eyre::Result<DriveCycleRecord> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("open drive cycle {:?}: {}", path, e))?;
    serde_json::from_str::<DriveCycleRecord>(&text)
        .map_err(|e| eyre::eyre!("parse drive cycle {:?}: {}", path, e))
}

/// Load a drive cycle, choosing the format from the file extension (`.json` or CSV).
pub fn load_drive_cycle(path: &Path) -> eyre::Result<DriveCycleRecord> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        load_drive_cycle_json(path)
    } else {
        load_drive_cycle_csv(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_vectors_are_flattened() {
        let p = parse_model_params(
            r#"{
                "IW": [[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]],
                "LW": [[1.0, -1.0]],
                "b1": [[0.0], [0.5]],
                "b2": [[0.25]],
                "x_min": [[-50.0], [0.0], [3.0]],
                "x_max": [[50.0], [45.0], [4.2]],
                "y_min": 0.0,
                "y_max": 1.0
            }"#,
        )
        .unwrap();
        assert_eq!(p.input_weights.len(), 2);
        assert_eq!(p.output_weights, vec![1.0, -1.0]);
        assert_eq!(p.hidden_bias, vec![0.0, 0.5]);
        assert_eq!(p.output_bias, 0.25);
        assert_eq!(p.x_max, vec![50.0, 45.0, 4.2]);
    }

    #[test]
    fn flat_iw_is_one_row() {
        let p = parse_model_params(
            r#"{"IW": [1, 2, 3], "LW": 1, "b1": 0, "b2": 0,
                "x_min": [0, 0, 0], "x_max": [1, 1, 1], "y_min": 0, "y_max": 100}"#,
        )
        .unwrap();
        assert_eq!(p.input_weights, vec![vec![1.0, 2.0, 3.0]]);
        assert_eq!(p.output_weights, vec![1.0]);
    }

    #[test]
    fn multi_valued_bias_is_rejected() {
        let err = parse_model_params(
            r#"{"IW": [[1, 2, 3]], "LW": [1], "b1": [0], "b2": [0, 1],
                "x_min": [0, 0, 0], "x_max": [1, 1, 1], "y_min": 0, "y_max": 1}"#,
        )
        .expect_err("b2 must be a single number");
        assert!(err.to_string().contains("single number"));
    }

    #[test]
    fn rows_drop_partial_time_column() {
        let rows = [
            DriveCycleRow {
                current: 1.0,
                voltage: 350.0,
                temperature: 25.0,
                time: Some(0.0),
            },
            DriveCycleRow {
                current: 1.0,
                voltage: 350.0,
                temperature: 25.0,
                time: None,
            },
        ];
        let rec = DriveCycleRecord::from_rows(&rows);
        assert_eq!(rec.current.len(), 2);
        assert!(rec.time.is_none());
    }
}
