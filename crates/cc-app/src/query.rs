//! Query helpers for extracting data from loaded runs.

use cc_results::TickRecord;

use crate::error::{AppError, AppResult};

/// Half-width of the comfort band around the set point (km/h).
pub const COMFORT_BAND_KPH: f64 = 4.0;

/// Summary of a run's time range and tracking quality.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub time_range: (f64, f64),
    pub record_count: usize,
    pub final_speed_kph: f64,
    pub final_gear: usize,
    pub gear_changes: usize,
    pub mean_abs_error_kph: f64,
    /// Share of ticks within [`COMFORT_BAND_KPH`] of the target.
    pub within_band_fraction: f64,
}

/// Variables that can be pulled out of a run with [`extract_series`].
pub const SERIES_VARIABLES: [&str; 6] = [
    "error_kph",
    "speed_kph",
    "gear",
    "throttle",
    "speedometer_kph",
    "inclination_deg",
];

pub fn get_run_summary(records: &[TickRecord], target_kph: f64) -> AppResult<RunSummary> {
    let (first, last) = match (records.first(), records.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(AppError::InvalidInput("No records in run".to_string())),
    };

    let gear_changes = records.windows(2).filter(|w| w[0].gear != w[1].gear).count();
    let n = records.len() as f64;
    let mean_abs_error_kph = records.iter().map(|r| r.error_kph.abs()).sum::<f64>() / n;
    let inside = records
        .iter()
        .filter(|r| (r.speed_kph - target_kph).abs() <= COMFORT_BAND_KPH)
        .count();

    Ok(RunSummary {
        time_range: (first.time_s, last.time_s),
        record_count: records.len(),
        final_speed_kph: last.speed_kph,
        final_gear: last.gear,
        gear_changes,
        mean_abs_error_kph,
        within_band_fraction: inside as f64 / n,
    })
}

/// Extract `(time_s, value)` pairs for one variable.
pub fn extract_series(records: &[TickRecord], variable: &str) -> AppResult<Vec<(f64, f64)>> {
    let pick: fn(&TickRecord) -> f64 = match variable {
        "error_kph" | "error" => |r| r.error_kph,
        "speed_kph" | "speed" => |r| r.speed_kph,
        "gear" => |r| r.gear as f64,
        "throttle" => |r| r.throttle,
        "speedometer_kph" | "speedometer" => |r| r.speedometer_kph,
        "inclination_deg" | "inclination" => |r| r.inclination_deg,
        _ => {
            return Err(AppError::InvalidInput(format!(
                "Unknown variable: {}",
                variable
            )));
        }
    };

    Ok(records.iter().map(|r| (r.time_s, pick(r))).collect())
}
