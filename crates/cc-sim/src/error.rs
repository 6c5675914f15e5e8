//! Error types for simulation runs.

use thiserror::Error;

/// Errors raised while setting up a run. Nothing fails once the loop starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Core(#[from] cc_core::CoreError),

    #[error("Controller: {0}")]
    Control(#[from] cc_controls::ControlError),

    #[error("Vehicle: {0}")]
    Vehicle(#[from] cc_vehicle::VehicleError),
}

pub type SimResult<T> = Result<T, SimError>;
