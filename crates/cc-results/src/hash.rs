//! Content-based hashing for run ids and scenario keys.

use cc_project::Scenario;
use sha2::{Digest, Sha256};

pub fn compute_run_id(scenario: &Scenario, engine_version: &str) -> String {
    let mut hasher = Sha256::new();

    let scenario_json = serde_json::to_string(scenario).unwrap_or_default();
    hasher.update(scenario_json.as_bytes());

    hasher.update(engine_version.as_bytes());

    format!("{:x}", hasher.finalize())
}

/// Identity of a scenario independent of its seed.
pub fn compute_scenario_key(scenario: &Scenario) -> String {
    let unseeded = Scenario {
        seed: None,
        ..scenario.clone()
    };
    let scenario_json = serde_json::to_string(&unseeded).unwrap_or_default();
    format!("{:x}", Sha256::digest(scenario_json.as_bytes()))
}
