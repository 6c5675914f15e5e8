//! Road grade disturbances.
//!
//! The road is an independent stochastic process feeding an inclination angle
//! (degrees, positive uphill) into the plant on every tick. Three variants:
//! - [`FlatRoad`]: no disturbance
//! - [`RoadInclinationGenerator`]: sparse random grade changes at Maxwell-distributed
//!   event ticks, with a leveling recovery once the grade has been static too long
//! - [`GradeProfile`]: a precomputed flat/uphill/flat/downhill pattern
//!
//! [`RoadProfile`] wraps the three behind the [`GradeSource`] trait so the
//! simulation driver never needs to know which one is active.

pub mod distributions;
pub mod error;
pub mod generator;
pub mod profile;
pub mod source;

pub use distributions::{Maxwell, Semicircular, TruncatedNormal};
pub use error::{RoadError, RoadResult};
pub use generator::{InclinationConfig, RecoveryMode, RoadInclinationGenerator};
pub use profile::{GradeProfile, SegmentedProfileConfig};
pub use source::{FlatRoad, GradeSource, RoadProfile};
