#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Battery state-of-charge estimation engine.
//!
//! Fuses a small trained network with a coulomb-counting integrator. Nothing
//! here does I/O; coefficients arrive as a validated `ParameterBundle`.
//!
//! ## Architecture
//!
//! - **Bundle**: validated network coefficients and scaling bounds (`bundle` module)
//! - **Predictor**: 3 → H (tanh) → 1 network, batch and single-sample (`predictor` module)
//! - **Physics**: charge integration with stop-at-empty (`physics` module)
//! - **Fusion**: fixed-weight blend pinned to zero at discharge (`fusion` module)
//! - **Estimator**: the two request shapes, point and trajectory (`estimator` module)
//! - **Configuration**: pack, fusion, predictor and seeding policy (`config` module)
//!
//! ## Units
//!
//! Current in amps, voltage in volts (pack level), time in seconds, SOC in
//! percent. Cell voltage is derived as pack voltage / series cells.

pub mod builder;
pub mod bundle;
pub mod config;
pub mod conversions;
pub mod error;
pub mod estimator;
pub mod fusion;
pub mod mocks;
pub mod physics;
pub mod predictor;
pub mod types;
pub mod util;

pub use builder::{EstimatorBuilder, build_estimator};
pub use bundle::{BundleParts, ParameterBundle};
pub use config::{CurrentSign, FusionCfg, PackCfg, PredictorCfg, StartSocPolicy};
pub use error::{BuildError, BundleError, SocError};
pub use estimator::{SocEstimator, SocEstimatorG};
pub use fusion::FusionEngine;
pub use physics::{PhysicsIntegrator, PhysicsTrajectory};
pub use predictor::NeuralPredictor;
pub use soc_traits::SocPredictor;
pub use types::{DriveCycle, Sample, Trajectory};
