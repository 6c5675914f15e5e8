//! Error types for the cc-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the backend crates' errors behind one
/// interface for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Project(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario file already exists: {0}")]
    ScenarioExists(PathBuf),

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Runtime build failed: {0}")]
    Runtime(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<cc_project::ProjectError> for AppError {
    fn from(err: cc_project::ProjectError) -> Self {
        match err {
            cc_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<cc_project::ValidationError> for AppError {
    fn from(err: cc_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<cc_sim::SimError> for AppError {
    fn from(err: cc_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}

impl From<cc_results::ResultsError> for AppError {
    fn from(err: cc_results::ResultsError) -> Self {
        match err {
            cc_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}

impl From<cc_controls::ControlError> for AppError {
    fn from(err: cc_controls::ControlError) -> Self {
        AppError::Runtime(err.to_string())
    }
}

impl From<cc_vehicle::VehicleError> for AppError {
    fn from(err: cc_vehicle::VehicleError) -> Self {
        AppError::Runtime(err.to_string())
    }
}

impl From<cc_road::RoadError> for AppError {
    fn from(err: cc_road::RoadError) -> Self {
        AppError::Runtime(err.to_string())
    }
}
