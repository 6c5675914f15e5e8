//! cc-results: run cache, time series storage and export.

pub mod export;
pub mod hash;
pub mod store;
pub mod types;

pub use export::{export_csv, write_csv};
pub use hash::{compute_run_id, compute_scenario_key};
pub use store::RunStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Run {run_id} holds {found} ticks, expected {expected}")]
    TickCountMismatch {
        run_id: String,
        expected: usize,
        found: usize,
    },

    #[error("Corrupt time series for {run_id} at line {line}: {source}")]
    CorruptTimeseries {
        run_id: String,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}
