//! Coulomb-counting SOC integrator.
//!
//! Walks the current series in order, moving SOC by `I·dt / (Ah·3600) · 100`
//! per step. The walk stops at the first step whose SOC reaches zero, so the
//! returned trajectory can be shorter than the input.

use std::borrow::Cow;

use crate::config::{CurrentSign, PackCfg};
use crate::util::{charge_delta_percent, clamp_percent, unit_time_basis};

/// Output of one integration run.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsTrajectory {
    /// SOC per step; element 0 is the start SOC. Length is `i + 1` when the
    /// pack discharged at step `i`, else the input length.
    pub soc: Vec<f64>,
    /// Time of full discharge, or the last timestamp when it never happened.
    /// `None` only for an empty input.
    pub discharge_time: Option<f64>,
    /// Whether the walk ended on a zero crossing.
    pub discharged: bool,
}

impl PhysicsTrajectory {
    pub fn len(&self) -> usize {
        self.soc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.soc.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PhysicsIntegrator {
    capacity_ah: f64,
    current_sign: CurrentSign,
}

impl PhysicsIntegrator {
    pub fn new(pack: &PackCfg) -> Self {
        Self {
            capacity_ah: pack.capacity_ah,
            current_sign: pack.current_sign,
        }
    }

    pub fn capacity_ah(&self) -> f64 {
        self.capacity_ah
    }

    /// Integrate `currents` (A) over `times` (s) starting from `start_soc` (%).
    ///
    /// `times` is used only when its length matches `currents`; otherwise steps
    /// are unit-spaced (`0, 1, 2, …`). A start SOC at or below zero is already
    /// discharged: the result is `[start_soc]` with discharge at the first timestamp.
    pub fn integrate(
        &self,
        currents: &[f64],
        times: Option<&[f64]>,
        start_soc: f64,
    ) -> PhysicsTrajectory {
        let n = currents.len();
        if n == 0 {
            return PhysicsTrajectory {
                soc: Vec::new(),
                discharge_time: None,
                discharged: false,
            };
        }

        let times: Cow<'_, [f64]> = match times {
            Some(t) if t.len() == n => Cow::Borrowed(t),
            Some(t) => {
                tracing::warn!(
                    times = t.len(),
                    currents = n,
                    "time array length mismatch; assuming dt=1s per step"
                );
                Cow::Owned(unit_time_basis(n))
            }
            None => {
                tracing::debug!("no time array; assuming dt=1s per step");
                Cow::Owned(unit_time_basis(n))
            }
        };

        tracing::debug!(start_soc, points = n, "physics integration start");
        let mut soc = Vec::with_capacity(n);
        soc.push(start_soc);

        if start_soc <= 0.0 {
            tracing::info!(t = times[0], "pack starts fully discharged");
            return PhysicsTrajectory {
                soc,
                discharge_time: Some(times[0]),
                discharged: true,
            };
        }

        let mut current_soc = start_soc;
        for i in 1..n {
            let dt = times[i] - times[i - 1];
            let amps = self.current_sign.apply(currents[i - 1]);
            let next = current_soc + charge_delta_percent(amps, dt, self.capacity_ah);

            if next <= 0.0 {
                soc.push(0.0);
                tracing::info!(t = times[i], step = i, "pack fully discharged");
                return PhysicsTrajectory {
                    soc,
                    discharge_time: Some(times[i]),
                    discharged: true,
                };
            }

            current_soc = clamp_percent(next);
            soc.push(current_soc);
        }

        PhysicsTrajectory {
            soc,
            discharge_time: Some(times[n - 1]),
            discharged: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integrator(capacity_ah: f64) -> PhysicsIntegrator {
        PhysicsIntegrator::new(&PackCfg {
            capacity_ah,
            ..PackCfg::default()
        })
    }

    #[test]
    fn empty_series_has_no_discharge_time() {
        let t = integrator(27.0).integrate(&[], None, 50.0);
        assert!(t.is_empty());
        assert_eq!(t.discharge_time, None);
    }

    #[test]
    fn single_sample_keeps_start() {
        let t = integrator(27.0).integrate(&[5.0], Some(&[12.0]), 64.0);
        assert_eq!(t.soc, vec![64.0]);
        assert_eq!(t.discharge_time, Some(12.0));
        assert!(!t.discharged);
    }

    #[test]
    fn zero_start_stops_immediately() {
        let t = integrator(27.0).integrate(&[10.0, 10.0, 10.0], None, 0.0);
        assert_eq!(t.soc, vec![0.0]);
        assert_eq!(t.discharge_time, Some(0.0));
        assert!(t.discharged);
    }

    #[test]
    fn overcharge_is_ceiling_clamped() {
        // 1 Ah pack, +1 A for 1800 s = +50 % from 80 % -> 100 %
        let t = integrator(1.0).integrate(&[1.0, 1.0], Some(&[0.0, 1800.0]), 80.0);
        assert_eq!(t.soc, vec![80.0, 100.0]);
    }

    #[test]
    fn uses_previous_sample_current() {
        // Step 1 uses currents[0] = 0, so nothing moves even though currents[1] is huge.
        let t = integrator(1.0).integrate(&[0.0, -1000.0], Some(&[0.0, 10.0]), 50.0);
        assert_eq!(t.soc, vec![50.0, 50.0]);
    }

    #[test]
    fn discharge_positive_sign_flips_direction() {
        let pack = PackCfg {
            capacity_ah: 1.0,
            current_sign: CurrentSign::DischargePositive,
            ..PackCfg::default()
        };
        let t = PhysicsIntegrator::new(&pack).integrate(&[1.0, 1.0], Some(&[0.0, 360.0]), 50.0);
        assert!((t.soc[1] - 40.0).abs() < 1e-9);
    }
}
