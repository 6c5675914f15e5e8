//! Motor torque curve and tractive force.
//!
//! The motor is modeled by a parabolic torque curve peaking at `omega_max`:
//!
//! ```text
//! T(ω) = max(T_max * (1 - β * (ω / ω_max - 1)²), 0)
//! ```
//!
//! with β = 0.4. Torque never goes negative, so far outside the intended
//! speed range the motor simply stops contributing.

use crate::vehicle::VehicleParams;

/// Curvature of the torque curve around its peak.
pub const TORQUE_CURVE_BETA: f64 = 0.4;

/// Motor torque (N·m) at motor speed `omega` (rad/s).
pub fn motor_torque(params: &VehicleParams, omega: f64) -> f64 {
    let x = omega / params.omega_max_rad_s - 1.0;
    (params.torque_max_nm * (1.0 - TORQUE_CURVE_BETA * x * x)).max(0.0)
}

/// Gear ratio over wheel radius (1/m) for a 1-based `gear`.
pub fn wheel_factor(params: &VehicleParams, gear: usize) -> f64 {
    params.gear_ratios[gear - 1] / params.wheel_radius_m
}

/// Motor speed (rad/s) for road speed `speed` (m/s) in `gear`.
pub fn engine_speed(params: &VehicleParams, gear: usize, speed: f64) -> f64 {
    speed * wheel_factor(params, gear)
}

/// Tractive force (N) for a throttle command in `[-1, 1]`.
pub fn drive_force(params: &VehicleParams, gear: usize, speed: f64, throttle: f64) -> f64 {
    let alpha = wheel_factor(params, gear);
    alpha * motor_torque(params, speed * alpha) * throttle
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camry() -> VehicleParams {
        VehicleParams::camry_xse_2025()
    }

    #[test]
    fn peak_torque_at_omega_max() {
        let params = camry();
        assert_eq!(motor_torque(&params, params.omega_max_rad_s), params.torque_max_nm);
    }

    #[test]
    fn torque_at_standstill() {
        let params = camry();
        let t0 = motor_torque(&params, 0.0);
        assert!((t0 - 0.6 * params.torque_max_nm).abs() < 1e-9);
    }

    #[test]
    fn torque_floor_is_zero() {
        let params = camry();
        assert_eq!(motor_torque(&params, 10.0 * params.omega_max_rad_s), 0.0);
        assert_eq!(motor_torque(&params, -10.0 * params.omega_max_rad_s), 0.0);
    }

    #[test]
    fn drive_force_scales_with_throttle() {
        let params = camry();
        let full = drive_force(&params, 1, 5.0, 1.0);
        let half = drive_force(&params, 1, 5.0, 0.5);
        let reverse = drive_force(&params, 1, 5.0, -1.0);
        assert!(full > 0.0);
        assert!((half - 0.5 * full).abs() < 1e-9);
        assert!((reverse + full).abs() < 1e-9);
    }

    #[test]
    fn engine_speed_follows_gear() {
        let params = camry();
        let first = engine_speed(&params, 1, 10.0);
        let top = engine_speed(&params, 8, 10.0);
        assert!((first - 10.0 * 5.25 / 0.3355).abs() < 1e-9);
        assert!(top < first);
    }
}
