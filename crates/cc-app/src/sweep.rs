//! Parallel controller gain sweeps.
//!
//! Every gain set runs the same scenario with the same seed, so the sensor
//! noise, road and fault draws are identical across the sweep and only the
//! controller differs.

use cc_core::SeedPlan;
use cc_project::Scenario;
use cc_sim::Summary;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::runtime;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainSet {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

/// Cartesian product of the candidate gains.
pub fn gain_grid(kp: &[f64], ki: &[f64], kd: &[f64]) -> Vec<GainSet> {
    let mut grid = Vec::with_capacity(kp.len() * ki.len() * kd.len());
    for &kp in kp {
        for &ki in ki {
            for &kd in kd {
                grid.push(GainSet { kp, ki, kd });
            }
        }
    }
    grid
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepOutcome {
    pub gains: GainSet,
    pub final_speed_kph: f64,
    pub mean_abs_error_kph: f64,
    pub within_band_fraction: f64,
    pub summary: Summary,
}

/// Run `base` once per gain set. Results keep the order of `gains`.
pub fn run_sweep(base: &Scenario, gains: &[GainSet]) -> AppResult<Vec<SweepOutcome>> {
    if gains.is_empty() {
        return Err(AppError::InvalidInput("Sweep needs at least one gain set".to_string()));
    }
    let seed = base.seed.unwrap_or_else(|| {
        use rand::RngCore;
        cc_core::entropy_rng().next_u64()
    });
    let target_kph = base.simulation.target_speed_kph;

    tracing::info!(runs = gains.len(), seed, "starting gain sweep");

    gains
        .par_iter()
        .map(|&set| -> AppResult<SweepOutcome> {
            let mut scenario = base.clone();
            scenario.controller.kp = set.kp;
            scenario.controller.ki = set.ki;
            scenario.controller.kd = set.kd;
            scenario.seed = Some(seed);

            let result = runtime::simulate(&scenario, &SeedPlan::fixed(seed))?;
            let summary = result
                .describe()
                .ok_or_else(|| AppError::Simulation("empty run".to_string()))?;
            let mean_abs_error_kph =
                result.error_kph.iter().map(|e| e.abs()).sum::<f64>() / result.len() as f64;

            Ok(SweepOutcome {
                gains: set,
                final_speed_kph: result.final_speed_kph().unwrap_or_default(),
                mean_abs_error_kph,
                within_band_fraction: result
                    .fraction_within_band(target_kph, crate::query::COMFORT_BAND_KPH),
                summary,
            })
        })
        .collect()
}

/// Outcome with the smallest mean absolute tracking error.
pub fn best_outcome(outcomes: &[SweepOutcome]) -> Option<&SweepOutcome> {
    outcomes
        .iter()
        .min_by(|a, b| a.mean_abs_error_kph.total_cmp(&b.mean_abs_error_kph))
}
