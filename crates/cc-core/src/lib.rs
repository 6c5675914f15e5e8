//! cc-core: shared foundation for the cruise control simulator.
//!
//! Contains:
//! - units (uom SI conversions for speeds and road angles)
//! - numeric (sign and range checks for model parameters)
//! - rng (seeded random streams for the stochastic components)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod rng;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use rng::{RngStream, SeedPlan, SimRng, entropy_rng, seeded_rng};
