//! `From` implementations bridging `soc_config` types to `soc_core` types.

use crate::bundle::{BundleParts, ParameterBundle};
use crate::config::{CurrentSign, FusionCfg, PackCfg, PredictorCfg, StartSocPolicy};
use crate::error::BundleError;
use crate::types::DriveCycle;

// ── PackCfg ──────────────────────────────────────────────────────────────────

impl From<soc_config::CurrentSign> for CurrentSign {
    fn from(c: soc_config::CurrentSign) -> Self {
        match c {
            soc_config::CurrentSign::AsMeasured => CurrentSign::AsMeasured,
            soc_config::CurrentSign::DischargePositive => CurrentSign::DischargePositive,
        }
    }
}

impl From<&soc_config::PackCfg> for PackCfg {
    fn from(c: &soc_config::PackCfg) -> Self {
        Self {
            capacity_ah: c.capacity_ah,
            series_cells: c.series_cells,
            current_sign: c.current_sign.into(),
        }
    }
}

// ── FusionCfg ────────────────────────────────────────────────────────────────

impl From<&soc_config::FusionCfg> for FusionCfg {
    fn from(c: &soc_config::FusionCfg) -> Self {
        Self {
            ml_weight: c.ml_weight,
        }
    }
}

// ── PredictorCfg ─────────────────────────────────────────────────────────────

impl From<&soc_config::PredictorCfg> for PredictorCfg {
    fn from(c: &soc_config::PredictorCfg) -> Self {
        Self {
            fraction_scale_threshold: c.fraction_scale_threshold,
            degenerate_range_eps: c.degenerate_range_eps,
        }
    }
}

// ── StartSocPolicy ───────────────────────────────────────────────────────────

impl From<&soc_config::PhysicsCfg> for StartSocPolicy {
    fn from(c: &soc_config::PhysicsCfg) -> Self {
        match c.start_soc {
            soc_config::StartSoc::FirstNeural => StartSocPolicy::FirstNeural {
                fallback: c.fixed_start_soc,
            },
            soc_config::StartSoc::Fixed => StartSocPolicy::Fixed(c.fixed_start_soc),
        }
    }
}

// ── ParameterBundle ──────────────────────────────────────────────────────────

impl From<&soc_config::ModelParams> for BundleParts {
    fn from(p: &soc_config::ModelParams) -> Self {
        Self {
            input_weights: p.input_weights.clone(),
            output_weights: p.output_weights.clone(),
            hidden_bias: p.hidden_bias.clone(),
            output_bias: p.output_bias,
            input_min: p.x_min.clone(),
            input_max: p.x_max.clone(),
            output_min: p.y_min,
            output_max: p.y_max,
        }
    }
}

impl TryFrom<&soc_config::ModelParams> for ParameterBundle {
    type Error = BundleError;
    fn try_from(p: &soc_config::ModelParams) -> Result<Self, Self::Error> {
        ParameterBundle::try_from(BundleParts::from(p))
    }
}

// ── DriveCycle ───────────────────────────────────────────────────────────────

impl From<soc_config::DriveCycleRecord> for DriveCycle {
    fn from(r: soc_config::DriveCycleRecord) -> Self {
        Self {
            current: r.current,
            voltage: r.voltage,
            temperature: r.temperature,
            time: r.time,
        }
    }
}
