//! Vehicle dynamics ("plant") for the cruise control loop.
//!
//! Provides:
//! - Vehicle parameters and per-run dynamic state
//! - Motor torque curve and drive force through the selected gear
//! - Resistive forces (grade, rolling friction, aerodynamic drag)
//! - Explicit Euler plant step with sudden-unintended-acceleration fault injection
//! - Transmission control unit (single-step gear selection)

pub mod dynamics;
pub mod error;
pub mod fault;
pub mod powertrain;
pub mod transmission;
pub mod vehicle;

pub use dynamics::{DEFAULT_ROLLING_FRICTION, ForceBreakdown, advance, forces};
pub use error::{VehicleError, VehicleResult};
pub use fault::{AccelerationFault, NoFault, P_SUA, SuaFault};
pub use powertrain::{drive_force, engine_speed, motor_torque};
pub use transmission::select_gear;
pub use vehicle::{DEFAULT_GEAR_RATIOS, GearRange, Vehicle, VehicleParams, VehicleState};
