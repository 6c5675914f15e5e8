//! Fixed-step simulation driver.

use crate::error::{SimError, SimResult};
use crate::record::SimulationResult;
use cc_controls::{EcuState, EngineControlUnit, SpeedSensor};
use cc_core::{ensure_finite, ensure_non_negative, ensure_positive};
use cc_road::GradeSource;
use cc_vehicle::{AccelerationFault, DEFAULT_ROLLING_FRICTION, Vehicle, advance, select_gear};

/// Options for one closed-loop run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    /// Cruise set point (m/s)
    pub target_speed_mps: f64,
    /// Speed at tick 0 (m/s)
    pub initial_speed_mps: f64,
    /// Number of ticks to simulate
    pub total_ticks: usize,
    /// Tick duration (seconds)
    pub dt: f64,
    /// Rolling friction coefficient μ
    pub rolling_friction: f64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            target_speed_mps: 30.0,
            initial_speed_mps: 0.0,
            total_ticks: 3_600,
            dt: 1.0,
            rolling_friction: DEFAULT_ROLLING_FRICTION,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        ensure_finite(self.target_speed_mps, "target_speed_mps")?;
        ensure_finite(self.initial_speed_mps, "initial_speed_mps")?;
        ensure_positive(self.dt, "dt")?;
        ensure_non_negative(self.rolling_friction, "rolling_friction")?;
        if self.total_ticks == 0 {
            return Err(SimError::InvalidArg {
                what: "total_ticks must be positive",
            });
        }
        Ok(())
    }
}

/// Progress of a running simulation, reported once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimProgress {
    /// Ticks completed so far.
    pub tick: usize,
    pub total_ticks: usize,
    pub fraction_complete: f64,
}

/// Run the cruise control loop.
///
/// The vehicle template is not touched; the run drives a copy placed at the
/// origin with `opts.initial_speed_mps`. Controller state starts from zero.
pub fn run_simulation<S, F, G>(
    vehicle: &Vehicle,
    ecu: &EngineControlUnit,
    sensor: &mut S,
    fault: &mut F,
    road: &mut G,
    opts: &SimOptions,
) -> SimResult<SimulationResult>
where
    S: SpeedSensor + ?Sized,
    F: AccelerationFault + ?Sized,
    G: GradeSource + ?Sized,
{
    run_simulation_with_progress(vehicle, ecu, sensor, fault, road, opts, None)
}

/// Same as [`run_simulation`], reporting progress after every tick.
pub fn run_simulation_with_progress<S, F, G>(
    vehicle: &Vehicle,
    ecu: &EngineControlUnit,
    sensor: &mut S,
    fault: &mut F,
    road: &mut G,
    opts: &SimOptions,
    mut progress_cb: Option<&mut dyn FnMut(SimProgress)>,
) -> SimResult<SimulationResult>
where
    S: SpeedSensor + ?Sized,
    F: AccelerationFault + ?Sized,
    G: GradeSource + ?Sized,
{
    opts.validate()?;
    ecu.validate()?;

    tracing::info!(
        target_mps = opts.target_speed_mps,
        initial_mps = opts.initial_speed_mps,
        ticks = opts.total_ticks,
        dt = opts.dt,
        "starting cruise control run"
    );

    let mut vehicle = vehicle.fresh_copy(opts.initial_speed_mps);
    let mut ecu_state = EcuState::default();
    let mut result = SimulationResult::with_capacity(opts.dt, opts.total_ticks);

    for tick in 0..opts.total_ticks {
        let measured = sensor.read(vehicle.speed());
        let error = opts.target_speed_mps - measured;

        let (next_state, throttle) = ecu.update(&ecu_state, error, opts.dt);
        ecu_state = next_state;

        let gear = select_gear(&vehicle, measured);
        if gear != vehicle.gear() {
            tracing::debug!(tick, from = vehicle.gear(), to = gear, "gear change");
        }
        vehicle.engage_gear(gear);

        let grade = road.grade_at(tick);
        let speed = advance(
            &mut vehicle,
            throttle,
            opts.dt,
            grade,
            opts.rolling_friction,
            fault,
        );

        result.push(tick, error, speed, gear, throttle, measured, grade);

        if let Some(cb) = progress_cb.as_deref_mut() {
            let done = tick + 1;
            cb(SimProgress {
                tick: done,
                total_ticks: opts.total_ticks,
                fraction_complete: done as f64 / opts.total_ticks as f64,
            });
        }
    }

    tracing::info!(
        final_speed_kph = result.final_speed_kph(),
        final_gear = result.gear.last().copied(),
        distance_m = vehicle.position(),
        "cruise control run finished"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_road::{FlatRoad, GradeProfile};
    use cc_vehicle::{NoFault, VehicleParams};

    /// Sensor reporting the true speed.
    struct Exact;

    impl SpeedSensor for Exact {
        fn read(&mut self, true_speed: f64) -> f64 {
            true_speed
        }
    }

    fn camry() -> Vehicle {
        Vehicle::new(VehicleParams::camry_xse_2025()).unwrap()
    }

    fn ecu() -> EngineControlUnit {
        EngineControlUnit::new(0.5, 0.2, 1.0).unwrap()
    }

    fn short(ticks: usize) -> SimOptions {
        SimOptions {
            total_ticks: ticks,
            ..SimOptions::default()
        }
    }

    #[test]
    fn default_options_are_valid() {
        assert!(SimOptions::default().validate().is_ok());
    }

    #[test]
    fn invalid_options_rejected_before_any_tick() {
        let mut reads = 0usize;
        struct Counting<'a>(&'a mut usize);
        impl SpeedSensor for Counting<'_> {
            fn read(&mut self, true_speed: f64) -> f64 {
                *self.0 += 1;
                true_speed
            }
        }

        for opts in [
            SimOptions { dt: 0.0, ..SimOptions::default() },
            SimOptions { dt: -1.0, ..SimOptions::default() },
            SimOptions { total_ticks: 0, ..SimOptions::default() },
            SimOptions { target_speed_mps: f64::NAN, ..SimOptions::default() },
            SimOptions { rolling_friction: -0.1, ..SimOptions::default() },
        ] {
            let err = run_simulation(
                &camry(),
                &ecu(),
                &mut Counting(&mut reads),
                &mut NoFault,
                &mut FlatRoad,
                &opts,
            );
            assert!(err.is_err(), "{opts:?}");
        }
        assert_eq!(reads, 0);
    }

    #[test]
    fn negative_gain_rejected() {
        let bad = EngineControlUnit {
            kp: -1.0,
            ki: 0.0,
            kd: 0.0,
            windup_protection: false,
        };
        let err = run_simulation(&camry(), &bad, &mut Exact, &mut NoFault, &mut FlatRoad, &short(10))
            .unwrap_err();
        assert!(matches!(err, SimError::Control(_)));
    }

    #[test]
    fn one_sample_per_tick() {
        let result =
            run_simulation(&camry(), &ecu(), &mut Exact, &mut NoFault, &mut FlatRoad, &short(25))
                .unwrap();
        assert_eq!(result.len(), 25);
        assert_eq!(result.tick, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn first_sample_follows_tick_order() {
        let opts = SimOptions {
            initial_speed_mps: 10.0,
            ..short(1)
        };
        let result =
            run_simulation(&camry(), &ecu(), &mut Exact, &mut NoFault, &mut FlatRoad, &opts).unwrap();

        // error 20 m/s, previous error 0: 0.5*20 + 0 + 1.0*20 saturates
        assert_eq!(result.throttle[0], 1.0);
        assert!((result.error_kph[0] - 72.0).abs() < 1e-9);
        assert!((result.speedometer_kph[0] - 36.0).abs() < 1e-9);
        // 36 km/h is above gear 2's band, one step up from gear 1
        assert_eq!(result.gear[0], 2);
        assert!(result.speed_kph[0] > 36.0);
    }

    #[test]
    fn template_is_not_mutated() {
        let template = camry();
        run_simulation(&template, &ecu(), &mut Exact, &mut NoFault, &mut FlatRoad, &short(50))
            .unwrap();
        assert_eq!(template.speed(), 0.0);
        assert_eq!(template.gear(), 1);
    }

    #[test]
    fn grade_recorded_from_road() {
        let mut road = GradeProfile::from_angles(vec![1.0, 2.0, 3.0]);
        let result =
            run_simulation(&camry(), &ecu(), &mut Exact, &mut NoFault, &mut road, &short(5)).unwrap();
        assert_eq!(result.inclination_deg, vec![1.0, 2.0, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn progress_reaches_completion() {
        let mut events = Vec::new();
        let mut cb = |p: SimProgress| events.push(p);
        run_simulation_with_progress(
            &camry(),
            &ecu(),
            &mut Exact,
            &mut NoFault,
            &mut FlatRoad,
            &short(4),
            Some(&mut cb),
        )
        .unwrap();

        assert_eq!(events.len(), 4);
        assert_eq!(events[0].tick, 1);
        let last = events[3];
        assert_eq!(last.tick, 4);
        assert_eq!(last.total_ticks, 4);
        assert_eq!(last.fraction_complete, 1.0);
    }

    #[test]
    fn dyn_components_accepted() {
        let mut sensor: Box<dyn SpeedSensor> = Box::new(Exact);
        let mut fault: Box<dyn AccelerationFault> = Box::new(NoFault);
        let mut road: Box<dyn GradeSource> = Box::new(FlatRoad);
        let result = run_simulation(
            &camry(),
            &ecu(),
            sensor.as_mut(),
            fault.as_mut(),
            road.as_mut(),
            &short(3),
        )
        .unwrap();
        assert_eq!(result.len(), 3);
    }
}
