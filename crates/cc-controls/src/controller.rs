//! Engine control unit.
//!
//! The ECU is a PID controller whose output is the normalized throttle
//! command. It provides:
//! - Output clamping to `[THROTTLE_MIN, THROTTLE_MAX]`
//! - Optional anti-windup (conditional integration)
//! - Sampled/digital operation: one update per simulation tick

use crate::error::ControlResult;
use cc_core::ensure_non_negative;
use serde::{Deserialize, Serialize};

/// Full braking / engine braking command.
pub const THROTTLE_MIN: f64 = -1.0;
/// Wide open throttle.
pub const THROTTLE_MAX: f64 = 1.0;

/// ECU configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineControlUnit {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
    /// Stop integrating while the throttle is saturated in the direction of the error.
    #[serde(default)]
    pub windup_protection: bool,
}

impl EngineControlUnit {
    /// Create a new ECU.
    ///
    /// # Arguments
    ///
    /// * `kp` - Proportional gain
    /// * `ki` - Integral gain
    /// * `kd` - Derivative gain
    ///
    /// All gains must be finite and non-negative.
    pub fn new(kp: f64, ki: f64, kd: f64) -> ControlResult<Self> {
        Ok(Self {
            kp: ensure_non_negative(kp, "kp")?,
            ki: ensure_non_negative(ki, "ki")?,
            kd: ensure_non_negative(kd, "kd")?,
            windup_protection: false,
        })
    }

    /// Proportional-only ECU.
    pub fn proportional(kp: f64) -> ControlResult<Self> {
        Self::new(kp, 0.0, 0.0)
    }

    /// Enable or disable anti-windup.
    pub fn with_windup_protection(mut self, enabled: bool) -> Self {
        self.windup_protection = enabled;
        self
    }

    /// Re-check the gains, e.g. after deserialization.
    pub fn validate(&self) -> ControlResult<()> {
        Self::new(self.kp, self.ki, self.kd).map(|_| ())
    }

    /// Compute the throttle command for one tick.
    ///
    /// # Arguments
    ///
    /// * `state` - Controller state (integral and previous error)
    /// * `error` - Tracking error, reference minus measurement
    /// * `dt` - Tick duration (seconds), must be positive
    ///
    /// # Returns
    ///
    /// Updated state and throttle in `[THROTTLE_MIN, THROTTLE_MAX]`.
    pub fn update(&self, state: &EcuState, error: f64, dt: f64) -> (EcuState, f64) {
        let derivative = (error - state.previous_error) / dt;

        // u = Kp*e + Ki*∫e dt + Kd*de/dt, integral taken before this tick's error
        let output_raw = self.kp * error + self.ki * state.integral + self.kd * derivative;
        let output = output_raw.clamp(THROTTLE_MIN, THROTTLE_MAX);

        let saturated_with_error = (output == THROTTLE_MAX && error > 0.0)
            || (output == THROTTLE_MIN && error < 0.0);
        let integral = if self.windup_protection && saturated_with_error {
            state.integral
        } else {
            state.integral + error * dt
        };

        let new_state = EcuState {
            integral,
            previous_error: error,
        };

        (new_state, output)
    }
}

/// ECU state carried between ticks of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EcuState {
    /// Integral accumulator.
    pub integral: f64,
    /// Error seen on the previous tick.
    pub previous_error: f64,
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn output_always_within_throttle_range(
            kp in 0.0_f64..100.0,
            ki in 0.0_f64..100.0,
            kd in 0.0_f64..100.0,
            errors in prop::collection::vec(-1.0e4_f64..1.0e4, 1..50),
            dt in 0.01_f64..10.0,
            windup in any::<bool>(),
        ) {
            let ecu = EngineControlUnit::new(kp, ki, kd).unwrap().with_windup_protection(windup);
            let mut state = EcuState::default();
            for e in errors {
                let (next, output) = ecu.update(&state, e, dt);
                prop_assert!((THROTTLE_MIN..=THROTTLE_MAX).contains(&output));
                prop_assert_eq!(next.previous_error, e);
                state = next;
            }
        }
    }
}
