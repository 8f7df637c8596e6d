//! Single-point and trajectory SOC estimation.
//!
//! `SocEstimatorG` wires one predictor, one physics integrator and one fusion
//! engine together. It holds no per-request state and can be shared across
//! threads; each call works only on its own inputs.

use soc_traits::SocPredictor;

use crate::config::{PackCfg, StartSocPolicy};
use crate::error::SocError;
use crate::fusion::FusionEngine;
use crate::physics::PhysicsIntegrator;
use crate::predictor::NeuralPredictor;
use crate::types::{DriveCycle, Sample, Trajectory};
use crate::util::clamp_percent;

/// Estimator generic over its predictor.
#[derive(Debug, Clone)]
pub struct SocEstimatorG<P> {
    pub(crate) predictor: P,
    pub(crate) pack: PackCfg,
    pub(crate) integrator: PhysicsIntegrator,
    pub(crate) fusion: FusionEngine,
    pub(crate) start_policy: StartSocPolicy,
}

/// Estimator backed by the trained neural predictor.
pub type SocEstimator = SocEstimatorG<NeuralPredictor>;

impl<P: SocPredictor> SocEstimatorG<P> {
    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    pub fn pack(&self) -> &PackCfg {
        &self.pack
    }

    pub fn integrator(&self) -> &PhysicsIntegrator {
        &self.integrator
    }

    pub fn fusion(&self) -> &FusionEngine {
        &self.fusion
    }

    pub fn start_policy(&self) -> StartSocPolicy {
        self.start_policy
    }

    /// SOC estimate (percent) for one sample, from the predictor alone.
    pub fn estimate_point(&self, sample: &Sample) -> Result<f64, SocError> {
        let out = self
            .predictor
            .predict(&[sample.current], &[sample.temperature], &[sample.voltage]);
        match out.first() {
            Some(&soc) if soc.is_finite() => Ok(clamp_percent(soc)),
            _ => Err(SocError::NonFinite),
        }
    }

    /// `estimate_point` with failures logged and mapped to `None`.
    pub fn estimate_point_or_none(&self, sample: &Sample) -> Option<f64> {
        self.estimate_point(sample)
            .inspect_err(|e| tracing::warn!(error = %e, ?sample, "point estimate failed"))
            .ok()
    }

    /// Fused SOC trajectory for a drive cycle.
    ///
    /// The trajectory stops at the first index where the integrated SOC hits
    /// zero; that index reads exactly 0.
    pub fn simulate(&self, cycle: &DriveCycle) -> Result<Trajectory, SocError> {
        let Some(n) = cycle.aligned_len() else {
            return Err(SocError::InputShapeMismatch {
                current: cycle.current.len(),
                voltage: cycle.voltage.len(),
                temperature: cycle.temperature.len(),
            });
        };
        if n == 0 {
            return Err(SocError::EmptyInput);
        }
        if !cycle.all_finite() {
            return Err(SocError::NonFinite);
        }

        let neural = self
            .predictor
            .predict(&cycle.current, &cycle.temperature, &cycle.voltage);

        let start_soc = self.start_policy.seed(neural.first().copied());
        let physics = self
            .integrator
            .integrate(&cycle.current, cycle.time.as_deref(), start_soc);

        let soc = self.fusion.fuse(&physics.soc, &neural);
        if soc.iter().any(|v| !v.is_finite()) {
            return Err(SocError::NonFinite);
        }

        tracing::info!(
            points = soc.len(),
            requested = n,
            discharged = physics.discharged,
            discharge_time = ?physics.discharge_time,
            "simulation complete"
        );
        Ok(Trajectory {
            soc,
            discharge_time: physics.discharge_time,
        })
    }

    /// `simulate` with failures logged and mapped to `Trajectory::empty()`.
    pub fn simulate_or_empty(&self, cycle: &DriveCycle) -> Trajectory {
        match self.simulate(cycle) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(error = %e, "simulation rejected; returning empty trajectory");
                Trajectory::empty()
            }
        }
    }
}

impl SocEstimator {
    /// Start building an estimator around a `ParameterBundle`.
    pub fn builder() -> crate::builder::EstimatorBuilder<crate::builder::Missing> {
        crate::builder::EstimatorBuilder::default()
    }
}
