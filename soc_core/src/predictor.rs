//! Fixed-topology neural SOC predictor: 3 inputs → H tanh units → 1 linear output.
//!
//! Per sample:
//! 1. cell voltage = pack voltage / series cells
//! 2. clamp `[current, temperature, cell_v]` to the bundle's input bounds
//! 3. normalize each channel to [-1, 1]
//! 4. `z = tanh(IW · x + b1)`, `y = LW · z + b2`
//! 5. denormalize `y` from [-1, 1] to `[output_min, output_max]`
//! 6. scale fractional models to percent, clamp to [0, 100]
//!
//! Samples are independent; batch order is preserved but never matters.

use std::sync::Arc;

use crate::bundle::{INPUT_CHANNELS, ParameterBundle};
use crate::config::PredictorCfg;
use crate::util::clamp_percent;

#[derive(Debug, Clone)]
pub struct NeuralPredictor {
    bundle: Arc<ParameterBundle>,
    series_cells: f64,
    /// Per-channel normalization denominators (`max - min`, or eps when zero).
    denom: [f64; INPUT_CHANNELS],
    /// 100.0 for fractional-output models, 1.0 for percent-output models.
    percent_scale: f64,
}

impl NeuralPredictor {
    /// `series_cells == 0` is read as 1 so the voltage channel never divides
    /// by zero; the estimator builder rejects 0 before it gets here.
    pub fn new(bundle: Arc<ParameterBundle>, series_cells: u32, cfg: PredictorCfg) -> Self {
        let (lo, hi) = (bundle.input_min(), bundle.input_max());
        let denom = std::array::from_fn(|c| {
            let d = hi[c] - lo[c];
            if d == 0.0 { cfg.degenerate_range_eps } else { d }
        });
        let percent_scale = if bundle.output_max() < cfg.fraction_scale_threshold {
            100.0
        } else {
            1.0
        };
        Self {
            bundle,
            series_cells: f64::from(series_cells.max(1)),
            denom,
            percent_scale,
        }
    }

    pub fn bundle(&self) -> &ParameterBundle {
        &self.bundle
    }

    /// True when the bundle's output range is a [0, 1] fraction scaled to percent.
    pub fn is_fractional(&self) -> bool {
        self.percent_scale != 1.0
    }

    /// SOC estimate (percent) for one sample.
    ///
    /// Finite inputs always produce a value in [0, 100], even when huge
    /// weights overflow the output sum. A NaN input propagates to a NaN
    /// output; callers decide how to treat it.
    pub fn predict_one(&self, current: f64, temperature: f64, voltage: f64) -> f64 {
        let b = &*self.bundle;
        let raw = [current, temperature, voltage / self.series_cells];
        let (lo, hi) = (b.input_min(), b.input_max());

        let mut x = [0.0f64; INPUT_CHANNELS];
        for c in 0..INPUT_CHANNELS {
            let clamped = raw[c].clamp(lo[c], hi[c]);
            // divide first: the ratio is in [0, 1] even for near-overflow widths
            x[c] = 2.0 * ((clamped - lo[c]) / self.denom[c]) - 1.0;
        }

        let mut y = b.output_bias();
        for ((w, bias), lw) in b
            .input_weights()
            .iter()
            .zip(b.hidden_bias())
            .zip(b.output_weights())
        {
            let a = w[0] * x[0] + w[1] * x[1] + w[2] * x[2] + bias;
            y += lw * a.tanh();
        }

        // Saturate an overflowed sum; with finite range widths `frac` can then
        // only be finite or infinite, never NaN.
        let y = y.clamp(f64::MIN, f64::MAX);
        let frac = (y + 1.0) * (b.output_max() - b.output_min()) / 2.0 + b.output_min();
        clamp_percent(frac * self.percent_scale)
    }

    /// Batch form of `predict_one`. The three slices are expected to be equal
    /// length; extra trailing elements of longer slices are ignored.
    pub fn predict(&self, currents: &[f64], temperatures: &[f64], voltages: &[f64]) -> Vec<f64> {
        let out: Vec<f64> = currents
            .iter()
            .zip(temperatures)
            .zip(voltages)
            .map(|((&i, &t), &v)| self.predict_one(i, t, v))
            .collect();
        tracing::debug!(points = out.len(), first = ?out.first(), "neural batch");
        out
    }
}

impl soc_traits::SocPredictor for NeuralPredictor {
    fn predict(&self, currents: &[f64], temperatures: &[f64], voltages: &[f64]) -> Vec<f64> {
        NeuralPredictor::predict(self, currents, temperatures, voltages)
    }
}
