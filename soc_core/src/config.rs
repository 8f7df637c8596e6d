//! Configuration types for the estimation engine.
//!
//! These are the runtime configuration structs handed to each component at
//! construction. They are separate from the TOML-deserialized config in
//! `soc_config`; see `conversions` for the mapping.

/// Rated capacity of the reference pack (Ah).
pub const DEFAULT_CAPACITY_AH: f64 = 27.0;
/// Series cell count of the reference pack.
pub const DEFAULT_SERIES_CELLS: u32 = 96;
/// Share of the neural estimate in the fused SOC.
pub const DEFAULT_ML_WEIGHT: f64 = 0.35;
/// Output ranges whose maximum is below this are fractional SOC models.
pub const FRACTION_SCALE_THRESHOLD: f64 = 2.0;
/// Normalization denominator substituted for zero-width input ranges.
pub const DEGENERATE_RANGE_EPS: f64 = 1e-9;
/// Integrator seed when no usable neural estimate exists.
pub const DEFAULT_START_SOC: f64 = 100.0;

/// Sign convention of the current channel as it enters the charge integral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CurrentSign {
    /// SOC moves by `+I*dt`.
    #[default]
    AsMeasured,
    /// Discharge is reported as positive current; SOC moves by `-I*dt`.
    DischargePositive,
}

impl CurrentSign {
    #[inline]
    pub fn apply(self, current: f64) -> f64 {
        match self {
            CurrentSign::AsMeasured => current,
            CurrentSign::DischargePositive => -current,
        }
    }
}

/// Battery pack constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackCfg {
    /// Rated capacity in amp-hours.
    pub capacity_ah: f64,
    /// Cells in series; cell voltage = pack voltage / series_cells.
    pub series_cells: u32,
    pub current_sign: CurrentSign,
}

impl Default for PackCfg {
    fn default() -> Self {
        Self {
            capacity_ah: DEFAULT_CAPACITY_AH,
            series_cells: DEFAULT_SERIES_CELLS,
            current_sign: CurrentSign::AsMeasured,
        }
    }
}

/// Blend policy for the fusion stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionCfg {
    /// Weight of the neural estimate; physics gets `1 - ml_weight`.
    pub ml_weight: f64,
}

impl Default for FusionCfg {
    fn default() -> Self {
        Self {
            ml_weight: DEFAULT_ML_WEIGHT,
        }
    }
}

/// Scaling policy for the neural predictor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictorCfg {
    /// If `output_max` is below this, network output is a fraction and is scaled by 100.
    pub fraction_scale_threshold: f64,
    /// Denominator used when `input_max == input_min` on a channel.
    pub degenerate_range_eps: f64,
}

impl Default for PredictorCfg {
    fn default() -> Self {
        Self {
            fraction_scale_threshold: FRACTION_SCALE_THRESHOLD,
            degenerate_range_eps: DEGENERATE_RANGE_EPS,
        }
    }
}

/// How the physics integrator is seeded for a trajectory request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StartSocPolicy {
    /// First neural estimate when it lies in [0, 100], else `fallback`.
    FirstNeural { fallback: f64 },
    /// Always this value.
    Fixed(f64),
}

impl Default for StartSocPolicy {
    fn default() -> Self {
        StartSocPolicy::FirstNeural {
            fallback: DEFAULT_START_SOC,
        }
    }
}

impl StartSocPolicy {
    /// Pick the integrator seed given the first neural estimate, if any.
    pub fn seed(self, first_neural: Option<f64>) -> f64 {
        match self {
            StartSocPolicy::Fixed(v) => v,
            StartSocPolicy::FirstNeural { fallback } => match first_neural {
                Some(v) if (0.0..=100.0).contains(&v) => v,
                _ => fallback,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_neural_seed_falls_back_when_out_of_range() {
        let p = StartSocPolicy::default();
        assert_eq!(p.seed(Some(42.0)), 42.0);
        assert_eq!(p.seed(Some(f64::NAN)), DEFAULT_START_SOC);
        assert_eq!(p.seed(Some(-1.0)), DEFAULT_START_SOC);
        assert_eq!(p.seed(None), DEFAULT_START_SOC);
    }

    #[test]
    fn fixed_seed_ignores_neural() {
        assert_eq!(StartSocPolicy::Fixed(80.0).seed(Some(10.0)), 80.0);
    }

    #[test]
    fn current_sign_flips_only_when_asked() {
        assert_eq!(CurrentSign::AsMeasured.apply(-3.0), -3.0);
        assert_eq!(CurrentSign::DischargePositive.apply(-3.0), 3.0);
    }
}
