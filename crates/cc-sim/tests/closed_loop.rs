//! End-to-end runs of the full loop with the Camry preset.

use cc_controls::{EngineControlUnit, Speedometer, SpeedometerConfig};
use cc_core::{RngStream, SeedPlan};
use cc_road::{FlatRoad, InclinationConfig, RoadInclinationGenerator, RoadProfile};
use cc_sim::{SimOptions, SimulationResult, run_simulation};
use cc_vehicle::{SuaFault, Vehicle, VehicleParams};

fn camry() -> Vehicle {
    Vehicle::new(VehicleParams::camry_xse_2025()).unwrap()
}

fn run_seeded(seed: u64, p_sua: f64, hilly: bool) -> SimulationResult {
    let plan = SeedPlan::fixed(seed);
    let ecu = EngineControlUnit::new(0.5, 0.2, 1.0).unwrap();
    let mut sensor =
        Speedometer::new(SpeedometerConfig::default(), plan.rng_for(RngStream::Sensor)).unwrap();
    let mut fault = SuaFault::new(p_sua, plan.rng_for(RngStream::Fault)).unwrap();
    let mut road = if hilly {
        RoadProfile::Random(
            RoadInclinationGenerator::new(
                InclinationConfig::default(),
                plan.rng_for(RngStream::Road),
            )
            .unwrap(),
        )
    } else {
        RoadProfile::Flat
    };

    run_simulation(
        &camry(),
        &ecu,
        &mut sensor,
        &mut fault,
        &mut road,
        &SimOptions::default(),
    )
    .unwrap()
}

#[test]
fn camry_reaches_cruise_speed() {
    let result = run_seeded(2025, 0.0, false);

    assert_eq!(result.len(), 3_600);
    let final_speed = result.final_speed_kph().unwrap();
    assert!(
        (final_speed - 108.0).abs() <= 10.8,
        "final speed {final_speed} km/h"
    );
    assert!(*result.gear.last().unwrap() >= 5);
}

#[test]
fn all_series_are_index_aligned() {
    let result = run_seeded(1, 0.02, true);
    let n = result.len();
    assert_eq!(result.error_kph.len(), n);
    assert_eq!(result.speed_kph.len(), n);
    assert_eq!(result.gear.len(), n);
    assert_eq!(result.throttle.len(), n);
    assert_eq!(result.speedometer_kph.len(), n);
    assert_eq!(result.inclination_deg.len(), n);
}

#[test]
fn gear_and_throttle_stay_in_range() {
    for seed in [3, 17, 99] {
        let result = run_seeded(seed, 0.02, true);
        assert!(result.gear.iter().all(|&g| (1..=8).contains(&g)));
        assert!(result.throttle.iter().all(|t| (-1.0..=1.0).contains(t)));
        assert!(result.inclination_deg.iter().all(|a| a.abs() <= 7.0));
        // speedometer clamps at 80 m/s
        assert!(result.speedometer_kph.iter().all(|&v| (0.0..=288.0 + 1e-9).contains(&v)));
    }
}

#[test]
fn gears_move_one_step_at_a_time() {
    let result = run_seeded(5, 0.02, true);
    for pair in result.gear.windows(2) {
        assert!(pair[0].abs_diff(pair[1]) <= 1, "{pair:?}");
    }
}

#[test]
fn identical_seeds_reproduce_bit_for_bit() {
    let a = run_seeded(42, 0.02, true);
    let b = run_seeded(42, 0.02, true);
    assert_eq!(a, b);

    let c = run_seeded(43, 0.02, true);
    assert_ne!(a.speedometer_kph, c.speedometer_kph);
}

#[test]
fn flat_road_records_zero_grade() {
    let ecu = EngineControlUnit::new(0.5, 0.2, 1.0).unwrap();
    let plan = SeedPlan::fixed(8);
    let mut sensor =
        Speedometer::new(SpeedometerConfig::default(), plan.rng_for(RngStream::Sensor)).unwrap();
    let mut fault = SuaFault::new(0.0, plan.rng_for(RngStream::Fault)).unwrap();
    let opts = SimOptions {
        total_ticks: 200,
        ..SimOptions::default()
    };
    let result = run_simulation(&camry(), &ecu, &mut sensor, &mut fault, &mut FlatRoad, &opts)
        .unwrap();
    assert!(result.inclination_deg.iter().all(|&a| a == 0.0));
    assert_eq!(fault.activations(), 0);
}
