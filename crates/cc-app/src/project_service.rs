//! Scenario loading, saving and validation.

use std::path::Path;

use cc_project::Scenario;

use crate::error::{AppError, AppResult};

/// Load a scenario file, YAML or JSON by extension.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    if !path.exists() {
        return Err(AppError::ScenarioFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    Ok(cc_project::load_scenario(path)?)
}

/// Save a scenario, JSON for `.json` paths and YAML otherwise.
pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        cc_project::save_json(path, scenario)?;
    } else {
        cc_project::save_yaml(path, scenario)?;
    }
    Ok(())
}

pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    Ok(cc_project::validate_scenario(scenario)?)
}

/// Write the default Camry scenario to `path`, refusing to overwrite.
pub fn init_scenario(path: &Path) -> AppResult<Scenario> {
    if path.exists() {
        return Err(AppError::ScenarioExists(path.to_path_buf()));
    }
    let scenario = Scenario::default();
    save_scenario(path, &scenario)?;
    tracing::info!(path = %path.display(), "wrote default scenario");
    Ok(scenario)
}
