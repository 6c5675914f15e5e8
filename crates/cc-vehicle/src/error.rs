//! Error types for vehicle model construction.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VehicleError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Gear list mismatch: {ranges} speed ranges for {ratios} gear ratios")]
    GearMismatch { ranges: usize, ratios: usize },

    #[error("Gear {gear} out of range (vehicle has {count} gears)")]
    GearOutOfRange { gear: usize, count: usize },

    #[error(transparent)]
    Core(#[from] cc_core::CoreError),
}

pub type VehicleResult<T> = Result<T, VehicleError>;
