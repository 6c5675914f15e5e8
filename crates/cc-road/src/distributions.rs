//! Continuous distributions used by the road model.
//!
//! `rand_distr` covers the normal family but not Maxwell or Wigner's
//! semicircle, so those are sampled here from standard normals and uniforms.

use crate::error::{RoadError, RoadResult};
use cc_core::{ensure_finite, ensure_positive};
use rand::Rng;
use rand_distr::{Distribution, Standard, StandardNormal};
use statrs::distribution::ContinuousCDF;

/// Maxwell-Boltzmann distribution shifted by `loc` and stretched by `scale`.
///
/// Equivalent to `loc + scale * |Z|` for a standard normal vector `Z` in three
/// dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maxwell {
    loc: f64,
    scale: f64,
}

impl Maxwell {
    pub fn new(loc: f64, scale: f64) -> RoadResult<Self> {
        Ok(Self {
            loc: ensure_finite(loc, "maxwell loc")?,
            scale: ensure_positive(scale, "maxwell scale")?,
        })
    }

    /// Distribution mean, `loc + 2 * scale * sqrt(2 / π)`.
    pub fn mean(&self) -> f64 {
        self.loc + 2.0 * self.scale * (2.0 / std::f64::consts::PI).sqrt()
    }
}

impl Distribution<f64> for Maxwell {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let x: f64 = StandardNormal.sample(rng);
        let y: f64 = StandardNormal.sample(rng);
        let z: f64 = StandardNormal.sample(rng);
        self.loc + self.scale * (x * x + y * y + z * z).sqrt()
    }
}

/// Wigner semicircle on `[loc - scale, loc + scale]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Semicircular {
    loc: f64,
    scale: f64,
}

impl Semicircular {
    pub fn new(loc: f64, scale: f64) -> RoadResult<Self> {
        Ok(Self {
            loc: ensure_finite(loc, "semicircular loc")?,
            scale: ensure_positive(scale, "semicircular scale")?,
        })
    }
}

impl Distribution<f64> for Semicircular {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        // x-coordinate of a point drawn uniformly from the unit disk
        let u: f64 = Standard.sample(rng);
        let w: f64 = Standard.sample(rng);
        let r = u.sqrt();
        let theta = std::f64::consts::TAU * w;
        self.loc + self.scale * r * theta.cos()
    }
}

/// Normal distribution restricted to `[low, high]`, sampled by inverse CDF.
///
/// An interval above the mean is mirrored below it before sampling so the
/// CDF values stay in the accurate lower tail.
#[derive(Debug, Clone, Copy)]
pub struct TruncatedNormal {
    normal: statrs::distribution::Normal,
    mean: f64,
    low: f64,
    high: f64,
    mirrored: bool,
    p_low: f64,
    p_high: f64,
}

/// Smallest probability mass an interval may carry.
const MIN_INTERVAL_MASS: f64 = 1e-12;

impl TruncatedNormal {
    pub fn new(mean: f64, std_dev: f64, low: f64, high: f64) -> RoadResult<Self> {
        ensure_finite(mean, "truncated normal mean")?;
        ensure_positive(std_dev, "truncated normal std_dev")?;
        ensure_finite(low, "truncated normal low")?;
        ensure_finite(high, "truncated normal high")?;
        if low >= high {
            return Err(RoadError::InvalidArg {
                what: "truncation bounds must satisfy low < high",
            });
        }
        let normal = statrs::distribution::Normal::new(mean, std_dev).map_err(|_| {
            RoadError::InvalidArg {
                what: "truncated normal parameters",
            }
        })?;

        let mirrored = low > mean;
        let (a, b) = if mirrored {
            (2.0 * mean - high, 2.0 * mean - low)
        } else {
            (low, high)
        };
        let p_low = normal.cdf(a);
        let p_high = normal.cdf(b);
        let mass = p_high - p_low;
        if mass.is_nan() || mass < MIN_INTERVAL_MASS {
            return Err(RoadError::InvalidArg {
                what: "truncation interval lies too far in the tail of the normal",
            });
        }

        Ok(Self {
            normal,
            mean,
            low,
            high,
            mirrored,
            p_low,
            p_high,
        })
    }
}

impl Distribution<f64> for TruncatedNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = Standard.sample(rng);
        let x = self.normal.inverse_cdf(self.p_low + u * (self.p_high - self.p_low));
        let x = if self.mirrored { 2.0 * self.mean - x } else { x };
        // inverse_cdf may land a rounding error outside the interval
        x.clamp(self.low, self.high)
    }
}
