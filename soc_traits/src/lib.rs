//! Seams shared between the estimation engine and its collaborators.

/// Maps a batch of measurements to SOC estimates in percent.
///
/// Inputs are index-aligned channel slices of equal length; the output has one
/// value per input index, in input order. Implementations must be pure: the
/// same inputs always yield the same outputs.
pub trait SocPredictor {
    fn predict(&self, currents: &[f64], temperatures: &[f64], voltages: &[f64]) -> Vec<f64>;
}

impl<P: SocPredictor + ?Sized> SocPredictor for &P {
    fn predict(&self, currents: &[f64], temperatures: &[f64], voltages: &[f64]) -> Vec<f64> {
        (**self).predict(currents, temperatures, voltages)
    }
}

impl<P: SocPredictor + ?Sized> SocPredictor for Box<P> {
    fn predict(&self, currents: &[f64], temperatures: &[f64], voltages: &[f64]) -> Vec<f64> {
        (**self).predict(currents, temperatures, voltages)
    }
}

impl<P: SocPredictor + ?Sized> SocPredictor for std::sync::Arc<P> {
    fn predict(&self, currents: &[f64], temperatures: &[f64], voltages: &[f64]) -> Vec<f64> {
        (**self).predict(currents, temperatures, voltages)
    }
}
