//! Test and helper mocks for soc_core

/// A predictor that answers every sample with the same SOC.
#[derive(Debug, Clone, Copy)]
pub struct ConstantPredictor(pub f64);

impl soc_traits::SocPredictor for ConstantPredictor {
    fn predict(&self, currents: &[f64], _temperatures: &[f64], _voltages: &[f64]) -> Vec<f64> {
        vec![self.0; currents.len()]
    }
}

/// A predictor that replays a fixed script, index for index, repeating the
/// last value once the script runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPredictor(pub Vec<f64>);

impl soc_traits::SocPredictor for ScriptedPredictor {
    fn predict(&self, currents: &[f64], _temperatures: &[f64], _voltages: &[f64]) -> Vec<f64> {
        let last = self.0.last().copied().unwrap_or(0.0);
        (0..currents.len())
            .map(|i| self.0.get(i).copied().unwrap_or(last))
            .collect()
    }
}
