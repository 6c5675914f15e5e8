//! Closed-loop cruise control simulation.
//!
//! Wires the speedometer, engine control unit, transmission, road and plant
//! into one fixed-step feedback loop and records the trajectory.

pub mod error;
pub mod record;
pub mod sim;

pub use error::{SimError, SimResult};
pub use record::{SampleRow, SeriesStats, SimulationResult, Summary};
pub use sim::{SimOptions, SimProgress, run_simulation, run_simulation_with_progress};
