//! Sudden unintended acceleration (SUA).
//!
//! On each tick the fault fires with a small probability and amplifies the
//! computed acceleration by a uniformly drawn 25–45 %.

use crate::error::VehicleResult;
use cc_core::{SimRng, ensure_probability};
use rand::Rng;

/// Default per-tick probability of an SUA event.
pub const P_SUA: f64 = 0.02;
/// Smallest relative amplification.
pub const SUA_GAIN_MIN: f64 = 0.25;
/// Largest relative amplification.
pub const SUA_GAIN_MAX: f64 = 0.45;

/// Perturbation applied to the plant acceleration before integration.
pub trait AccelerationFault {
    /// Acceleration (m/s²) after the fault process has acted on it.
    fn perturb(&mut self, acceleration: f64) -> f64;
}

/// Healthy drivetrain.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFault;

impl AccelerationFault for NoFault {
    fn perturb(&mut self, acceleration: f64) -> f64 {
        acceleration
    }
}

/// Random SUA process owning its random source.
#[derive(Debug, Clone)]
pub struct SuaFault<R = SimRng> {
    probability: f64,
    rng: R,
    activations: usize,
}

impl<R: Rng> SuaFault<R> {
    /// `probability` of 0 never fires, 1 fires on every tick.
    pub fn new(probability: f64, rng: R) -> VehicleResult<Self> {
        Ok(Self {
            probability: ensure_probability(probability, "sua probability")?,
            rng,
            activations: 0,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Number of ticks on which the fault fired so far.
    pub fn activations(&self) -> usize {
        self.activations
    }
}

impl<R: Rng> AccelerationFault for SuaFault<R> {
    fn perturb(&mut self, acceleration: f64) -> f64 {
        // Both draws happen every tick so the stream position does not depend on the outcome.
        let r: f64 = self.rng.gen_range(0.0..1.0);
        let gain = self.rng.gen_range(SUA_GAIN_MIN..=SUA_GAIN_MAX);

        if r < self.probability {
            self.activations += 1;
            tracing::debug!(acceleration, gain, "sudden unintended acceleration");
            acceleration + acceleration * gain
        } else {
            acceleration
        }
    }
}
