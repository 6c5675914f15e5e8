//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;

use cc_core::SeedPlan;
use cc_project::Scenario;
use cc_results::{RunManifest, RunStore, RunType, TickRecord};
use cc_sim::SimProgress;
use rand::RngCore;

use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage};
use crate::project_service;
use crate::runtime;

/// Engine version mixed into every run id.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Options for running simulations.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub engine_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            engine_version: ENGINE_VERSION.to_string(),
        }
    }
}

/// Request to execute the scenario stored at `scenario_path`.
pub struct RunRequest<'a> {
    pub scenario_path: &'a Path,
    pub options: RunOptions,
}

/// Wall-clock timing of a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub build_time_s: f64,
    pub simulate_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    sim: Option<SimProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
            sim,
        });
    }
}

/// Pin a seed on unseeded scenarios so every stored run can be replayed.
pub fn resolve_seed(scenario: &Scenario) -> Scenario {
    let mut scenario = scenario.clone();
    if scenario.seed.is_none() {
        scenario.seed = Some(cc_core::entropy_rng().next_u64());
    }
    scenario
}

/// Execute or load the run for a scenario file.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and stream progress events.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();

    emit_progress(
        &mut progress_cb,
        RunStage::LoadingScenario,
        started,
        Some("Loading scenario".to_string()),
        None,
    );
    let scenario = resolve_seed(&project_service::load_scenario(request.scenario_path)?);
    let store = RunStore::for_scenario(request.scenario_path)?;

    execute_or_load(&scenario, &store, &request.options, &mut progress_cb, started)
}

/// Same as [`ensure_run_with_progress`] for an in-memory scenario and store.
pub fn ensure_scenario_run(
    scenario: &Scenario,
    store: &RunStore,
    options: &RunOptions,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let scenario = resolve_seed(scenario);
    execute_or_load(&scenario, store, options, &mut progress_cb, Instant::now())
}

fn execute_or_load(
    scenario: &Scenario,
    store: &RunStore,
    options: &RunOptions,
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    started: Instant,
) -> AppResult<RunResponse> {
    let mut timing = RunTimingSummary::default();

    emit_progress(
        progress_cb,
        RunStage::CheckingCache,
        started,
        Some("Checking run cache".to_string()),
        None,
    );
    let run_id = cc_results::compute_run_id(scenario, &options.engine_version);

    if options.use_cache && store.has_run(&run_id) {
        emit_progress(
            progress_cb,
            RunStage::LoadingCachedResult,
            started,
            Some("Loading cached run".to_string()),
            None,
        );

        let load_started = Instant::now();
        let manifest = store.load_manifest(&run_id)?;
        timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
        timing.total_time_s = started.elapsed().as_secs_f64();

        tracing::info!(%run_id, "loaded cached run");
        emit_progress(
            progress_cb,
            RunStage::Completed,
            started,
            Some("Loaded cached run".to_string()),
            None,
        );

        return Ok(RunResponse {
            run_id,
            manifest,
            loaded_from_cache: true,
            timing,
        });
    }

    emit_progress(
        progress_cb,
        RunStage::BuildingRuntime,
        started,
        Some("Building runtime".to_string()),
        None,
    );
    let build_started = Instant::now();
    let mut rt = runtime::build_runtime(scenario, &SeedPlan::from_option(scenario.seed))?;
    timing.build_time_s = build_started.elapsed().as_secs_f64();

    let sim_started = Instant::now();
    let result = {
        let mut on_tick = |p: SimProgress| {
            emit_progress(progress_cb, RunStage::Simulating, started, None, Some(p));
        };
        rt.run_with_progress(Some(&mut on_tick))?
    };
    timing.simulate_time_s = sim_started.elapsed().as_secs_f64();

    emit_progress(
        progress_cb,
        RunStage::SavingResults,
        started,
        Some("Saving results".to_string()),
        None,
    );
    let save_started = Instant::now();
    let manifest = RunManifest {
        run_id: run_id.clone(),
        scenario_key: cc_results::compute_scenario_key(scenario),
        scenario_name: scenario.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        run_type: RunType::ClosedLoop {
            dt_s: scenario.simulation.dt_s,
            total_ticks: scenario.simulation.total_ticks,
            target_speed_kph: scenario.simulation.target_speed_kph,
            road: scenario.road.kind_name().to_string(),
        },
        engine_version: options.engine_version.clone(),
        seed: scenario.seed,
        summary: result.describe(),
    };
    let ticks = store.save_run(&manifest, result.rows())?;
    timing.save_time_s = save_started.elapsed().as_secs_f64();
    timing.total_time_s = started.elapsed().as_secs_f64();

    tracing::info!(%run_id, ticks, "run saved");
    emit_progress(
        progress_cb,
        RunStage::Completed,
        started,
        Some("Run completed".to_string()),
        None,
    );

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        timing,
    })
}

/// Stored runs of the scenario in `scenario_path`, every seed, oldest first.
///
/// Other scenarios sharing the directory keep their runs in the same store
/// and are left out.
pub fn list_runs(scenario_path: &Path) -> AppResult<Vec<RunManifest>> {
    let scenario = project_service::load_scenario(scenario_path)?;
    let store = RunStore::for_scenario(scenario_path)?;
    Ok(store.list_runs_for(&cc_results::compute_scenario_key(&scenario))?)
}

/// Load one stored run.
pub fn load_run(
    scenario_path: &Path,
    run_id: &str,
) -> AppResult<(RunManifest, Vec<TickRecord>)> {
    let store = RunStore::for_scenario(scenario_path)?;
    Ok(store.load_run(run_id)?)
}
