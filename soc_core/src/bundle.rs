//! Trained network coefficients and scaling bounds.
//!
//! A `ParameterBundle` can only be obtained through validation, so the
//! predictor never has to re-check shapes. Once built it is immutable and is
//! shared behind an `Arc`.

use crate::error::BundleError;

/// Number of network inputs: current, temperature, cell voltage.
pub const INPUT_CHANNELS: usize = 3;

/// Unvalidated bundle contents, as read from a coefficient file.
#[derive(Debug, Clone, Default)]
pub struct BundleParts {
    /// Hidden x 3, row-major.
    pub input_weights: Vec<Vec<f64>>,
    /// 1 x hidden.
    pub output_weights: Vec<f64>,
    pub hidden_bias: Vec<f64>,
    pub output_bias: f64,
    pub input_min: Vec<f64>,
    pub input_max: Vec<f64>,
    pub output_min: f64,
    pub output_max: f64,
}

/// Validated, immutable coefficients for the fixed 3 → H (tanh) → 1 network.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBundle {
    input_weights: Vec<[f64; INPUT_CHANNELS]>,
    output_weights: Vec<f64>,
    hidden_bias: Vec<f64>,
    output_bias: f64,
    input_min: [f64; INPUT_CHANNELS],
    input_max: [f64; INPUT_CHANNELS],
    output_min: f64,
    output_max: f64,
}

fn all_finite(v: &[f64]) -> bool {
    v.iter().all(|x| x.is_finite())
}

fn channels(what: &'static str, v: &[f64]) -> Result<[f64; INPUT_CHANNELS], BundleError> {
    <[f64; INPUT_CHANNELS]>::try_from(v).map_err(|_| BundleError::ChannelBounds {
        what,
        len: v.len(),
    })
}

impl TryFrom<BundleParts> for ParameterBundle {
    type Error = BundleError;

    fn try_from(p: BundleParts) -> Result<Self, Self::Error> {
        let hidden = p.input_weights.len();
        if hidden == 0 {
            return Err(BundleError::EmptyHidden);
        }

        let mut input_weights = Vec::with_capacity(hidden);
        for (row, w) in p.input_weights.iter().enumerate() {
            let r = <[f64; INPUT_CHANNELS]>::try_from(w.as_slice()).map_err(|_| {
                BundleError::InputColumns {
                    row,
                    cols: w.len(),
                }
            })?;
            if !all_finite(&r) {
                return Err(BundleError::NonFinite("input_weights"));
            }
            input_weights.push(r);
        }

        if p.output_weights.len() != hidden {
            return Err(BundleError::HiddenWidth {
                what: "output_weights",
                len: p.output_weights.len(),
                hidden,
            });
        }
        if p.hidden_bias.len() != hidden {
            return Err(BundleError::HiddenWidth {
                what: "hidden_bias",
                len: p.hidden_bias.len(),
                hidden,
            });
        }
        if !all_finite(&p.output_weights) {
            return Err(BundleError::NonFinite("output_weights"));
        }
        if !all_finite(&p.hidden_bias) {
            return Err(BundleError::NonFinite("hidden_bias"));
        }
        if !p.output_bias.is_finite() {
            return Err(BundleError::NonFinite("output_bias"));
        }

        let input_min = channels("input_min", &p.input_min)?;
        let input_max = channels("input_max", &p.input_max)?;
        if !all_finite(&input_min) || !all_finite(&input_max) {
            return Err(BundleError::NonFinite("input bounds"));
        }
        for channel in 0..INPUT_CHANNELS {
            if input_max[channel] < input_min[channel] {
                return Err(BundleError::InvertedInputRange {
                    channel,
                    min: input_min[channel],
                    max: input_max[channel],
                });
            }
            if !(input_max[channel] - input_min[channel]).is_finite() {
                return Err(BundleError::UnboundedRange {
                    what: "input",
                    min: input_min[channel],
                    max: input_max[channel],
                });
            }
        }

        if !p.output_min.is_finite() || !p.output_max.is_finite() {
            return Err(BundleError::NonFinite("output bounds"));
        }
        if p.output_max < p.output_min {
            return Err(BundleError::InvertedOutputRange {
                min: p.output_min,
                max: p.output_max,
            });
        }
        if !(p.output_max - p.output_min).is_finite() {
            return Err(BundleError::UnboundedRange {
                what: "output",
                min: p.output_min,
                max: p.output_max,
            });
        }

        Ok(Self {
            input_weights,
            output_weights: p.output_weights,
            hidden_bias: p.hidden_bias,
            output_bias: p.output_bias,
            input_min,
            input_max,
            output_min: p.output_min,
            output_max: p.output_max,
        })
    }
}

impl ParameterBundle {
    /// Hidden-layer width H.
    pub fn hidden_width(&self) -> usize {
        self.input_weights.len()
    }

    pub fn input_weights(&self) -> &[[f64; INPUT_CHANNELS]] {
        &self.input_weights
    }

    pub fn output_weights(&self) -> &[f64] {
        &self.output_weights
    }

    pub fn hidden_bias(&self) -> &[f64] {
        &self.hidden_bias
    }

    pub fn output_bias(&self) -> f64 {
        self.output_bias
    }

    pub fn input_min(&self) -> [f64; INPUT_CHANNELS] {
        self.input_min
    }

    pub fn input_max(&self) -> [f64; INPUT_CHANNELS] {
        self.input_max
    }

    pub fn output_min(&self) -> f64 {
        self.output_min
    }

    pub fn output_max(&self) -> f64 {
        self.output_max
    }

    /// Channels whose normalization range has zero width.
    pub fn degenerate_channels(&self) -> impl Iterator<Item = usize> + '_ {
        (0..INPUT_CHANNELS).filter(|&c| self.input_max[c] == self.input_min[c])
    }
}
