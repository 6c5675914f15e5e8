//! Shared application service layer for the cruise control simulator.
//!
//! Builds runnable loops from scenario files, executes and caches runs,
//! and answers queries about stored results for the CLI.

pub mod error;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod run_service;
pub mod runtime;
pub mod sweep;

pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage};
pub use project_service::{init_scenario, load_scenario, save_scenario, validate_scenario};
pub use query::{COMFORT_BAND_KPH, RunSummary, SERIES_VARIABLES, extract_series, get_run_summary};
pub use run_service::{
    ENGINE_VERSION, RunOptions, RunRequest, RunResponse, RunTimingSummary, ensure_run,
    ensure_run_with_progress, ensure_scenario_run, list_runs, load_run, resolve_seed,
};
pub use runtime::{ScenarioRuntime, build_runtime, sim_options, simulate};
pub use sweep::{GainSet, SweepOutcome, best_outcome, gain_grid, run_sweep};
