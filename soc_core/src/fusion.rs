//! Per-index blend of the neural and physics SOC trajectories.
//!
//! The physics trajectory drives the output length: it may be shorter than the
//! neural one because integration stops at full discharge. Where physics reads
//! zero the fused value is pinned to zero.

use crate::config::FusionCfg;
use crate::util::clamp_percent;

#[derive(Debug, Clone, Copy)]
pub struct FusionEngine {
    ml_weight: f64,
}

impl FusionEngine {
    pub fn new(cfg: &FusionCfg) -> Self {
        Self {
            ml_weight: cfg.ml_weight,
        }
    }

    pub fn ml_weight(&self) -> f64 {
        self.ml_weight
    }

    /// Fuse one index. `ml` is ignored when physics says the pack is empty.
    #[inline]
    pub fn fuse_point(&self, physics: f64, ml: f64) -> f64 {
        if physics <= 0.0 {
            return 0.0;
        }
        clamp_percent(self.ml_weight * ml + (1.0 - self.ml_weight) * physics)
    }

    /// Fuse two trajectories. Output length equals `physics.len()`; a neural
    /// trajectory that runs short is padded with the physics value.
    pub fn fuse(&self, physics: &[f64], neural: &[f64]) -> Vec<f64> {
        physics
            .iter()
            .enumerate()
            .map(|(idx, &ph)| {
                let ml = neural.get(idx).copied().unwrap_or(ph);
                self.fuse_point(ph, ml)
            })
            .collect()
    }
}
