//! Transmission control unit.
//!
//! Gear selection runs on the measured speed, not the true one, and moves at
//! most one gear per tick even when the speed jumps across several bands.

use crate::vehicle::Vehicle;

/// Gear (1-based) the TCU wants for `measured_speed` (m/s).
///
/// - inside the current gear's band (bounds excluded): keep
/// - above the next gear's lower bound: upshift by one
/// - below the previous gear's upper bound: downshift by one
/// - otherwise keep
pub fn select_gear(vehicle: &Vehicle, measured_speed: f64) -> usize {
    let gear = vehicle.gear();
    let ranges = &vehicle.params().gear_speed_ranges;

    if ranges[gear - 1].contains_mps(measured_speed) {
        return gear;
    }

    if gear < ranges.len() && measured_speed > ranges[gear].low_mps() {
        return gear + 1;
    }

    if gear > 1 && measured_speed < ranges[gear - 2].high_mps() {
        return gear - 1;
    }

    gear
}
