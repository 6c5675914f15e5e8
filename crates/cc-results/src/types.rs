//! Result data types.

use cc_sim::{SampleRow, Summary};
use serde::{Deserialize, Serialize};

pub type RunId = String;

/// One line of `timeseries.jsonl`, one row of the CSV export.
pub type TickRecord = SampleRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    /// Hash of the scenario with its seed cleared. Runs that differ only in
    /// seed share a key.
    pub scenario_key: String,
    pub scenario_name: String,
    pub timestamp: String,
    pub run_type: RunType,
    pub engine_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

impl RunManifest {
    /// Number of rows the stored time series must hold.
    pub fn expected_ticks(&self) -> usize {
        match &self.run_type {
            RunType::ClosedLoop { total_ticks, .. } => *total_ticks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunType {
    ClosedLoop {
        dt_s: f64,
        total_ticks: usize,
        target_speed_kph: f64,
        road: String,
    },
}
