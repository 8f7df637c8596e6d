//! Type-state builder for `SocEstimator` and generic `build_estimator` constructor.
//!
//! The builder enforces at compile time that a parameter bundle is provided
//! before `build()` is available. `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use soc_traits::SocPredictor;

use crate::bundle::ParameterBundle;
use crate::config::*;
use crate::error::{BuildError, Result};
use crate::estimator::{SocEstimator, SocEstimatorG};
use crate::fusion::FusionEngine;
use crate::physics::PhysicsIntegrator;
use crate::predictor::NeuralPredictor;

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `SocEstimator`. All fields are validated on `build()`.
pub struct EstimatorBuilder<B> {
    bundle: Option<Arc<ParameterBundle>>,
    pack: Option<PackCfg>,
    fusion: Option<FusionCfg>,
    predictor: Option<PredictorCfg>,
    start_policy: Option<StartSocPolicy>,
    _b: PhantomData<B>,
}

impl Default for EstimatorBuilder<Missing> {
    fn default() -> Self {
        Self {
            bundle: None,
            pack: None,
            fusion: None,
            predictor: None,
            start_policy: None,
            _b: PhantomData,
        }
    }
}

impl EstimatorBuilder<Missing> {
    /// Seed every setting from a parsed TOML config; the bundle is still required.
    pub fn from_config(cfg: &soc_config::Config) -> Self {
        Self::default()
            .with_pack((&cfg.pack).into())
            .with_fusion((&cfg.fusion).into())
            .with_predictor((&cfg.predictor).into())
            .with_start_policy((&cfg.physics).into())
    }
}

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

/// Validate configuration and assemble the pipeline around `predictor`.
///
/// Single source of truth for validation, used by both
/// `EstimatorBuilder::try_build()` and `build_estimator()`.
fn validate_and_build<P: SocPredictor>(
    predictor: P,
    pack: PackCfg,
    fusion: FusionCfg,
    start_policy: StartSocPolicy,
) -> Result<SocEstimatorG<P>> {
    if !(pack.capacity_ah.is_finite() && pack.capacity_ah > 0.0) {
        return Err(invalid("capacity_ah must be > 0"));
    }
    if pack.series_cells == 0 {
        return Err(invalid("series_cells must be >= 1"));
    }
    if !(0.0..=1.0).contains(&fusion.ml_weight) {
        return Err(invalid("ml_weight must be in [0, 1]"));
    }
    let seed_ok = |v: f64| (0.0..=100.0).contains(&v);
    match start_policy {
        StartSocPolicy::Fixed(v) | StartSocPolicy::FirstNeural { fallback: v } if !seed_ok(v) => {
            return Err(invalid("start SOC must be in [0, 100]"));
        }
        _ => {}
    }

    Ok(SocEstimatorG {
        predictor,
        pack,
        integrator: PhysicsIntegrator::new(&pack),
        fusion: FusionEngine::new(&fusion),
        start_policy,
    })
}

fn validate_predictor(cfg: &PredictorCfg) -> Result<()> {
    let thr = cfg.fraction_scale_threshold;
    if !(thr.is_finite() && thr > 0.0) {
        return Err(invalid("fraction_scale_threshold must be > 0"));
    }
    let eps = cfg.degenerate_range_eps;
    if !(eps > 0.0 && eps < 1.0) {
        return Err(invalid("degenerate_range_eps must be in (0, 1)"));
    }
    Ok(())
}

impl<B> EstimatorBuilder<B> {
    /// Fallible build available in any type-state; returns detailed error for missing pieces.
    pub fn try_build(self) -> Result<SocEstimator> {
        let bundle = self
            .bundle
            .ok_or_else(|| eyre::Report::new(BuildError::MissingBundle))?;
        let pack = self.pack.unwrap_or_default();
        let predictor_cfg = self.predictor.unwrap_or_default();
        validate_predictor(&predictor_cfg)?;

        let predictor = NeuralPredictor::new(bundle, pack.series_cells, predictor_cfg);
        validate_and_build(
            predictor,
            pack,
            self.fusion.unwrap_or_default(),
            self.start_policy.unwrap_or_default(),
        )
    }
}

/// Chainable setters that do not affect type-state.
impl<B> EstimatorBuilder<B> {
    pub fn with_pack(mut self, pack: PackCfg) -> Self {
        self.pack = Some(pack);
        self
    }
    pub fn with_fusion(mut self, fusion: FusionCfg) -> Self {
        self.fusion = Some(fusion);
        self
    }
    pub fn with_predictor(mut self, predictor: PredictorCfg) -> Self {
        self.predictor = Some(predictor);
        self
    }
    pub fn with_start_policy(mut self, policy: StartSocPolicy) -> Self {
        self.start_policy = Some(policy);
        self
    }
}

// Setter that advances type-state
impl EstimatorBuilder<Missing> {
    pub fn with_bundle(self, bundle: impl Into<Arc<ParameterBundle>>) -> EstimatorBuilder<Set> {
        EstimatorBuilder {
            bundle: Some(bundle.into()),
            pack: self.pack,
            fusion: self.fusion,
            predictor: self.predictor,
            start_policy: self.start_policy,
            _b: PhantomData,
        }
    }
}

impl EstimatorBuilder<Set> {
    /// Validate and build the estimator. Only available once a bundle is set.
    pub fn build(self) -> Result<SocEstimator> {
        self.try_build()
    }
}

/// Build an estimator around any `SocPredictor`.
///
/// Shares `validate_and_build` with `EstimatorBuilder::try_build`.
pub fn build_estimator<P: SocPredictor>(
    predictor: P,
    pack: PackCfg,
    fusion: FusionCfg,
    start_policy: Option<StartSocPolicy>,
) -> Result<SocEstimatorG<P>> {
    validate_and_build(predictor, pack, fusion, start_policy.unwrap_or_default())
}
