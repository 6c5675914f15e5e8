//! Build the runnable loop components from a scenario.

use cc_controls::{EngineControlUnit, Speedometer};
use cc_core::units::kph_to_mps;
use cc_core::{RngStream, SeedPlan};
use cc_project::{RoadDef, Scenario};
use cc_road::{GradeProfile, RoadInclinationGenerator, RoadProfile};
use cc_sim::{SimOptions, SimProgress, SimulationResult, run_simulation_with_progress};
use cc_vehicle::{SuaFault, Vehicle};

use crate::error::AppResult;

/// Everything one run needs, each stochastic part holding its own stream.
#[derive(Debug, Clone)]
pub struct ScenarioRuntime {
    pub vehicle: Vehicle,
    pub ecu: EngineControlUnit,
    pub sensor: Speedometer,
    pub fault: SuaFault,
    pub road: RoadProfile,
    pub options: SimOptions,
}

pub fn sim_options(scenario: &Scenario) -> SimOptions {
    let sim = &scenario.simulation;
    SimOptions {
        target_speed_mps: kph_to_mps(sim.target_speed_kph),
        initial_speed_mps: kph_to_mps(sim.initial_speed_kph),
        total_ticks: sim.total_ticks,
        dt: sim.dt_s,
        rolling_friction: sim.rolling_friction,
    }
}

pub fn build_road(road: &RoadDef, plan: &SeedPlan) -> AppResult<RoadProfile> {
    let mut rng = plan.rng_for(RngStream::Road);
    Ok(match road {
        RoadDef::Flat => RoadProfile::Flat,
        RoadDef::Random { config } => {
            RoadProfile::Random(RoadInclinationGenerator::new(config.clone(), rng)?)
        }
        RoadDef::Segmented { config } => {
            RoadProfile::Segmented(GradeProfile::generate(config, &mut rng)?)
        }
    })
}

/// Validate `scenario` and assemble its components.
pub fn build_runtime(scenario: &Scenario, plan: &SeedPlan) -> AppResult<ScenarioRuntime> {
    cc_project::validate_scenario(scenario)?;

    let vehicle = Vehicle::new(scenario.vehicle.clone())?;
    let ecu = scenario.controller.clone();
    ecu.validate()?;
    let sensor = Speedometer::new(scenario.sensor.clone(), plan.rng_for(RngStream::Sensor))?;
    let fault = SuaFault::new(scenario.faults.sua_probability, plan.rng_for(RngStream::Fault))?;
    let road = build_road(&scenario.road, plan)?;

    tracing::debug!(
        scenario = %scenario.name,
        road = scenario.road.kind_name(),
        seed = plan.seed(),
        "runtime built"
    );

    Ok(ScenarioRuntime {
        vehicle,
        ecu,
        sensor,
        fault,
        road,
        options: sim_options(scenario),
    })
}

impl ScenarioRuntime {
    pub fn run(&mut self) -> AppResult<SimulationResult> {
        self.run_with_progress(None)
    }

    pub fn run_with_progress(
        &mut self,
        progress_cb: Option<&mut dyn FnMut(SimProgress)>,
    ) -> AppResult<SimulationResult> {
        let result = run_simulation_with_progress(
            &self.vehicle,
            &self.ecu,
            &mut self.sensor,
            &mut self.fault,
            &mut self.road,
            &self.options,
            progress_cb,
        )?;
        if self.fault.activations() > 0 {
            tracing::info!(activations = self.fault.activations(), "SUA events during run");
        }
        Ok(result)
    }
}

/// Build and run `scenario` once without touching any store.
pub fn simulate(scenario: &Scenario, plan: &SeedPlan) -> AppResult<SimulationResult> {
    build_runtime(scenario, plan)?.run()
}
