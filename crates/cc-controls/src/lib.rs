//! Feedback and control elements of the cruise control loop.
//!
//! - **Controller**: the engine control unit, a PID throttle law with optional
//!   anti-windup, split into an immutable configuration and a per-run state.
//! - **Sensor**: the speedometer, which reports the plant speed with Gaussian
//!   noise of random sign and clamps the reading to the instrument range.
//!
//! Both elements are driven once per tick by the simulation driver.

pub mod controller;
pub mod error;
pub mod sensor;

pub use controller::{EcuState, EngineControlUnit, THROTTLE_MAX, THROTTLE_MIN};
pub use error::{ControlError, ControlResult};
pub use sensor::{SpeedSensor, Speedometer, SpeedometerConfig};
