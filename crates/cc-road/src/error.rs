//! Error types for road disturbance construction.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoadError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Core(#[from] cc_core::CoreError),
}

pub type RoadResult<T> = Result<T, RoadError>;
