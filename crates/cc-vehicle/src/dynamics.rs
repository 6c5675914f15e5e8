//! Longitudinal vehicle dynamics.
//!
//! Newton's second law along the road:
//!
//! ```text
//! m * dv/dt = F_drive - F_grade - F_roll - F_drag
//! ```
//!
//! where:
//! - F_grade = m g sin θ
//! - F_roll = m g μ sgn(v), zero at standstill
//! - F_drag = ½ Cd A ρ |v| v
//!
//! The step is explicit Euler. Position advances with the speed at the start
//! of the step, speed with the acceleration evaluated at the start of the step.

use crate::fault::AccelerationFault;
use crate::powertrain::drive_force;
use crate::vehicle::Vehicle;
use cc_core::sign;
use cc_core::units::constants::{AIR_DENSITY_KG_M3, G0_MPS2};
use cc_core::units::deg_to_rad;

/// Rolling friction coefficient for tyres on asphalt.
pub const DEFAULT_ROLLING_FRICTION: f64 = 0.01;

/// Forces acting on the vehicle for one step (N).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceBreakdown {
    pub drive_n: f64,
    pub grade_n: f64,
    pub rolling_n: f64,
    pub drag_n: f64,
}

impl ForceBreakdown {
    /// Sum of the resistive forces.
    pub fn disturbance_n(&self) -> f64 {
        self.grade_n + self.rolling_n + self.drag_n
    }

    /// Net force over mass (m/s²).
    pub fn acceleration(&self, mass_kg: f64) -> f64 {
        (self.drive_n - self.disturbance_n()) / mass_kg
    }
}

/// Evaluate all forces at the vehicle's current state.
///
/// # Arguments
/// * `throttle` - Command in `[-1, 1]`
/// * `grade_deg` - Road inclination (degrees, positive uphill)
/// * `rolling_friction` - Rolling friction coefficient μ
pub fn forces(
    vehicle: &Vehicle,
    throttle: f64,
    grade_deg: f64,
    rolling_friction: f64,
) -> ForceBreakdown {
    let params = vehicle.params();
    let m = params.mass_kg;
    let v = vehicle.speed();

    ForceBreakdown {
        drive_n: drive_force(params, vehicle.gear(), v, throttle),
        grade_n: m * G0_MPS2 * deg_to_rad(grade_deg).sin(),
        rolling_n: m * G0_MPS2 * rolling_friction * sign(v),
        drag_n: 0.5 * params.drag_coefficient * params.frontal_area_m2 * AIR_DENSITY_KG_M3 * v.abs() * v,
    }
}

/// Advance the vehicle by one tick and return the new speed (m/s).
///
/// Mutates position and speed in place; the gear is left to the TCU.
pub fn advance<F>(
    vehicle: &mut Vehicle,
    throttle: f64,
    dt: f64,
    grade_deg: f64,
    rolling_friction: f64,
    fault: &mut F,
) -> f64
where
    F: AccelerationFault + ?Sized,
{
    let breakdown = forces(vehicle, throttle, grade_deg, rolling_friction);
    let a = fault.perturb(breakdown.acceleration(vehicle.params().mass_kg));

    let v = vehicle.state.speed_mps;
    let v_new = v + a * dt;
    vehicle.state.position_m += v * dt;
    vehicle.state.speed_mps = v_new;

    v_new
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::{NoFault, SuaFault};
    use crate::vehicle::VehicleParams;
    use cc_core::seeded_rng;

    fn camry_at(speed: f64) -> Vehicle {
        Vehicle::new(VehicleParams::camry_xse_2025())
            .unwrap()
            .fresh_copy(speed)
    }

    #[test]
    fn at_rest_without_input_stays_at_rest() {
        let mut vehicle = camry_at(0.0);
        let v = advance(&mut vehicle, 0.0, 1.0, 0.0, DEFAULT_ROLLING_FRICTION, &mut NoFault);
        assert_eq!(v, 0.0);
        assert_eq!(vehicle.position(), 0.0);
    }

    #[test]
    fn rolling_resistance_zero_at_standstill() {
        let vehicle = camry_at(0.0);
        let f = forces(&vehicle, 0.0, 0.0, DEFAULT_ROLLING_FRICTION);
        assert_eq!(f.rolling_n, 0.0);
        assert_eq!(f.drag_n, 0.0);
    }

    #[test]
    fn position_uses_pre_step_speed() {
        let mut vehicle = camry_at(10.0);
        let v_new = advance(&mut vehicle, 1.0, 2.0, 0.0, DEFAULT_ROLLING_FRICTION, &mut NoFault);
        assert_eq!(vehicle.position(), 20.0);
        assert_eq!(vehicle.speed(), v_new);
        assert!(v_new != 10.0);
    }

    #[test]
    fn drag_opposes_motion_both_ways() {
        let forward = forces(&camry_at(20.0), 0.0, 0.0, DEFAULT_ROLLING_FRICTION);
        let backward = forces(&camry_at(-20.0), 0.0, 0.0, DEFAULT_ROLLING_FRICTION);
        assert!(forward.drag_n > 0.0);
        assert!((forward.drag_n + backward.drag_n).abs() < 1e-9);
        assert!(forward.rolling_n > 0.0 && backward.rolling_n < 0.0);
    }

    #[test]
    fn uphill_slows_coasting_vehicle_more() {
        let mut flat = camry_at(20.0);
        let mut hill = camry_at(20.0);
        let v_flat = advance(&mut flat, 0.0, 1.0, 0.0, DEFAULT_ROLLING_FRICTION, &mut NoFault);
        let v_hill = advance(&mut hill, 0.0, 1.0, 5.0, DEFAULT_ROLLING_FRICTION, &mut NoFault);
        assert!(v_hill < v_flat);

        let expected = G0_MPS2 * deg_to_rad(5.0).sin();
        assert!(((v_flat - v_hill) - expected).abs() < 1e-9);
    }

    #[test]
    fn acceleration_matches_force_balance() {
        let vehicle = camry_at(15.0);
        let f = forces(&vehicle, 0.7, 2.0, DEFAULT_ROLLING_FRICTION);
        let mut stepped = vehicle.clone();
        let v_new = advance(&mut stepped, 0.7, 0.1, 2.0, DEFAULT_ROLLING_FRICTION, &mut NoFault);
        let a = f.acceleration(vehicle.params().mass_kg);
        assert!((v_new - (15.0 + a * 0.1)).abs() < 1e-12);
    }

    #[test]
    fn forced_fault_increases_acceleration() {
        let healthy = {
            let mut v = camry_at(5.0);
            advance(&mut v, 1.0, 1.0, 0.0, DEFAULT_ROLLING_FRICTION, &mut NoFault) - 5.0
        };
        let faulty = {
            let mut v = camry_at(5.0);
            let mut fault = SuaFault::new(1.0, seeded_rng(2)).unwrap();
            advance(&mut v, 1.0, 1.0, 0.0, DEFAULT_ROLLING_FRICTION, &mut fault) - 5.0
        };
        assert!(healthy > 0.0);
        assert!(faulty >= healthy * 1.25 - 1e-12);
        assert!(faulty <= healthy * 1.45 + 1e-12);
    }
}
