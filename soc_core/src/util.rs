//! Small numeric helpers shared by the estimation stages.

/// Lower bound of the SOC scale (percent).
pub const SOC_MIN: f64 = 0.0;
/// Upper bound of the SOC scale (percent).
pub const SOC_MAX: f64 = 100.0;
/// Seconds per hour, for amp-hour conversions.
pub const SECS_PER_HOUR: f64 = 3600.0;

/// Clamp a percentage to [0, 100]. NaN passes through unchanged.
#[inline]
pub fn clamp_percent(x: f64) -> f64 {
    x.clamp(SOC_MIN, SOC_MAX)
}

/// Synthetic time basis `0, 1, 2, …` of length `n` (seconds).
pub fn unit_time_basis(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

/// Percent of rated capacity moved by `current` amps over `dt` seconds.
#[inline]
pub fn charge_delta_percent(current: f64, dt: f64, capacity_ah: f64) -> f64 {
    (current * dt) / (capacity_ah * SECS_PER_HOUR) * 100.0
}
