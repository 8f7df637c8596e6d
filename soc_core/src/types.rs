//! Request and result shapes of the estimator.

/// One measurement: current (A), pack voltage (V), temperature, optional time (s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub current: f64,
    pub voltage: f64,
    pub temperature: f64,
    pub time: Option<f64>,
}

impl Sample {
    pub fn new(current: f64, voltage: f64, temperature: f64) -> Self {
        Self {
            current,
            voltage,
            temperature,
            time: None,
        }
    }

    pub fn at(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }
}

/// Channel arrays of a trajectory request, index-aligned and chronological.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriveCycle {
    pub current: Vec<f64>,
    pub voltage: Vec<f64>,
    pub temperature: Vec<f64>,
    pub time: Option<Vec<f64>>,
}

impl DriveCycle {
    /// Length shared by all three channels, or `None` if they disagree.
    pub fn aligned_len(&self) -> Option<usize> {
        let n = self.current.len();
        (self.voltage.len() == n && self.temperature.len() == n).then_some(n)
    }

    /// Timestamps usable for integration: present and matching the channel length.
    pub fn times(&self) -> Option<&[f64]> {
        self.time
            .as_deref()
            .filter(|t| t.len() == self.current.len())
    }

    pub fn all_finite(&self) -> bool {
        let finite = |v: &[f64]| v.iter().all(|x| x.is_finite());
        finite(&self.current)
            && finite(&self.voltage)
            && finite(&self.temperature)
            && self.times().is_none_or(finite)
    }
}

impl FromIterator<Sample> for DriveCycle {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        let mut cycle = DriveCycle::default();
        let mut time = Some(Vec::new());
        for s in iter {
            cycle.current.push(s.current);
            cycle.voltage.push(s.voltage);
            cycle.temperature.push(s.temperature);
            match (time.as_mut(), s.time) {
                (Some(t), Some(ts)) => t.push(ts),
                _ => time = None,
            }
        }
        cycle.time = time.filter(|t| !t.is_empty());
        cycle
    }
}

/// Fused SOC trajectory returned for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    /// Fused SOC (percent), aligned with the input up to the discharge point.
    pub soc: Vec<f64>,
    /// Time of full discharge, or the last timestamp if it never happened.
    pub discharge_time: Option<f64>,
}

impl Trajectory {
    /// The defined empty result: no points, no discharge time.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn total_points(&self) -> usize {
        self.soc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.soc.is_empty()
    }
}
