//! Precomputed segmented grade profile.
//!
//! The road repeats a flat / uphill / flat / downhill pattern. Every tick of
//! a segment draws its own angle from a normal distribution around the
//! segment mean, truncated to the configured bounds.

use crate::distributions::TruncatedNormal;
use crate::error::{RoadError, RoadResult};
use rand::Rng;
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentedProfileConfig {
    pub flat_mean_deg: f64,
    pub uphill_mean_deg: f64,
    pub downhill_mean_deg: f64,
    pub std_dev_deg: f64,
    pub lower_bound_deg: f64,
    pub upper_bound_deg: f64,
    /// Ticks per segment: flat, uphill, flat, downhill.
    pub segment_ticks: [usize; 4],
    /// Profile length in ticks.
    pub size: usize,
}

impl Default for SegmentedProfileConfig {
    fn default() -> Self {
        Self {
            flat_mean_deg: 0.0,
            uphill_mean_deg: 5.0,
            downhill_mean_deg: -5.0,
            std_dev_deg: 1.0,
            lower_bound_deg: -7.0,
            upper_bound_deg: 7.0,
            segment_ticks: [100, 150, 100, 150],
            size: 3_600,
        }
    }
}

impl SegmentedProfileConfig {
    pub fn validate(&self) -> RoadResult<()> {
        if self.segment_ticks.iter().sum::<usize>() == 0 {
            return Err(RoadError::InvalidArg {
                what: "segment lengths must not all be zero",
            });
        }
        // probes the mean, std and bounds of every segment
        self.segment_distributions().map(|_| ())
    }

    fn segment_distributions(&self) -> RoadResult<Vec<TruncatedNormal>> {
        self.segment_means()
            .into_iter()
            .map(|mean| {
                TruncatedNormal::new(mean, self.std_dev_deg, self.lower_bound_deg, self.upper_bound_deg)
            })
            .collect()
    }

    fn segment_means(&self) -> [f64; 4] {
        [
            self.flat_mean_deg,
            self.uphill_mean_deg,
            self.flat_mean_deg,
            self.downhill_mean_deg,
        ]
    }
}

/// Grade per tick; ticks past the end are level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeProfile {
    angles: Vec<f64>,
}

impl GradeProfile {
    pub fn generate<R: Rng + ?Sized>(
        config: &SegmentedProfileConfig,
        rng: &mut R,
    ) -> RoadResult<Self> {
        config.validate()?;
        let segments = config.segment_distributions()?;

        let mut angles = Vec::with_capacity(config.size);
        'fill: loop {
            for (dist, &len) in segments.iter().zip(&config.segment_ticks) {
                for _ in 0..len {
                    if angles.len() == config.size {
                        break 'fill;
                    }
                    angles.push(dist.sample(rng));
                }
            }
        }

        Ok(Self { angles })
    }

    pub fn from_angles(angles: Vec<f64>) -> Self {
        Self { angles }
    }

    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    pub fn angle_at(&self, tick: usize) -> f64 {
        self.angles.get(tick).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_core::seeded_rng;

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    #[test]
    fn default_profile_follows_pattern() {
        let profile =
            GradeProfile::generate(&SegmentedProfileConfig::default(), &mut seeded_rng(10)).unwrap();
        assert_eq!(profile.len(), 3_600);
        assert!(profile.angles().iter().all(|a| (-7.0..=7.0).contains(a)));

        let a = profile.angles();
        assert!(mean(&a[0..100]).abs() < 0.5);
        assert!((mean(&a[100..250]) - 5.0).abs() < 0.5);
        assert!(mean(&a[250..350]).abs() < 0.5);
        assert!((mean(&a[350..500]) + 5.0).abs() < 0.5);
        // pattern repeats every 500 ticks
        assert!((mean(&a[600..750]) - 5.0).abs() < 0.5);
    }

    #[test]
    fn past_end_is_level() {
        let profile = GradeProfile::from_angles(vec![1.0, 2.0]);
        assert_eq!(profile.angle_at(1), 2.0);
        assert_eq!(profile.angle_at(2), 0.0);
    }

    #[test]
    fn short_profile_is_truncated() {
        let config = SegmentedProfileConfig {
            size: 42,
            ..SegmentedProfileConfig::default()
        };
        let profile = GradeProfile::generate(&config, &mut seeded_rng(1)).unwrap();
        assert_eq!(profile.len(), 42);
    }

    #[test]
    fn zero_length_segments_rejected() {
        let config = SegmentedProfileConfig {
            segment_ticks: [0; 4],
            ..SegmentedProfileConfig::default()
        };
        assert!(GradeProfile::generate(&config, &mut seeded_rng(1)).is_err());
    }

    #[test]
    fn inverted_bounds_rejected() {
        let config = SegmentedProfileConfig {
            lower_bound_deg: 7.0,
            upper_bound_deg: -7.0,
            ..SegmentedProfileConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unreachable_segment_mean_rejected() {
        let config = SegmentedProfileConfig {
            uphill_mean_deg: 30.0,
            ..SegmentedProfileConfig::default()
        };
        assert!(config.validate().is_err());

        let reachable = SegmentedProfileConfig {
            uphill_mean_deg: 8.0,
            ..SegmentedProfileConfig::default()
        };
        let profile = GradeProfile::generate(&reachable, &mut seeded_rng(2)).unwrap();
        assert!(profile.angles().iter().all(|a| (-7.0..=7.0).contains(a)));
    }
}
