//! Speed sensing.
//!
//! The speedometer is the feedback element of the loop: it reads the plant
//! speed and reports it with an additive Gaussian error of random sign,
//! clamped to the instrument range.

use crate::error::{ControlError, ControlResult};
use cc_core::{SimRng, ensure_finite, ensure_non_negative};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

pub const SPEEDOMETER_BIAS: f64 = 0.0; // m/s
pub const SPEEDOMETER_STD: f64 = 0.2778; // m/s
pub const SPEEDOMETER_MIN_READING: f64 = 0.0; // m/s
pub const SPEEDOMETER_MAX_READING: f64 = 80.0; // m/s

/// Anything that turns the true plant speed into a measurement.
pub trait SpeedSensor {
    /// Measured speed (m/s) for the given true speed (m/s).
    fn read(&mut self, true_speed: f64) -> f64;
}

/// Speedometer noise model and instrument range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedometerConfig {
    /// Mean of the error magnitude (m/s).
    pub bias: f64,
    /// Standard deviation of the error magnitude (m/s).
    pub std_dev: f64,
    /// Lowest reading the instrument can show (m/s).
    pub min_reading: f64,
    /// Highest reading the instrument can show (m/s).
    pub max_reading: f64,
}

impl Default for SpeedometerConfig {
    fn default() -> Self {
        Self {
            bias: SPEEDOMETER_BIAS,
            std_dev: SPEEDOMETER_STD,
            min_reading: SPEEDOMETER_MIN_READING,
            max_reading: SPEEDOMETER_MAX_READING,
        }
    }
}

impl SpeedometerConfig {
    pub fn validate(&self) -> ControlResult<()> {
        ensure_finite(self.bias, "speedometer bias")?;
        ensure_non_negative(self.std_dev, "speedometer std_dev")?;
        ensure_finite(self.min_reading, "speedometer min_reading")?;
        ensure_finite(self.max_reading, "speedometer max_reading")?;
        if self.min_reading >= self.max_reading {
            return Err(ControlError::InvalidArg {
                what: "min_reading must be less than max_reading",
            });
        }
        Ok(())
    }
}

/// Noisy speedometer owning its random source.
#[derive(Debug, Clone)]
pub struct Speedometer<R = SimRng> {
    config: SpeedometerConfig,
    noise: Normal<f64>,
    rng: R,
}

impl<R: Rng> Speedometer<R> {
    pub fn new(config: SpeedometerConfig, rng: R) -> ControlResult<Self> {
        config.validate()?;
        let noise = Normal::new(config.bias, config.std_dev).map_err(|_| {
            ControlError::InvalidArg {
                what: "speedometer noise distribution",
            }
        })?;
        Ok(Self { config, noise, rng })
    }

    pub fn config(&self) -> &SpeedometerConfig {
        &self.config
    }
}

impl<R: Rng> SpeedSensor for Speedometer<R> {
    fn read(&mut self, true_speed: f64) -> f64 {
        let error = self.noise.sample(&mut self.rng);
        let factor = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        (true_speed + factor * error).clamp(self.config.min_reading, self.config.max_reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_core::seeded_rng;

    fn speedometer(seed: u64) -> Speedometer {
        Speedometer::new(SpeedometerConfig::default(), seeded_rng(seed)).unwrap()
    }

    #[test]
    fn clamps_far_above_range() {
        let mut sensor = speedometer(7);
        for _ in 0..100 {
            assert_eq!(sensor.read(200.0), SPEEDOMETER_MAX_READING);
        }
    }

    #[test]
    fn clamps_below_range() {
        let mut sensor = speedometer(7);
        for _ in 0..100 {
            assert_eq!(sensor.read(-50.0), SPEEDOMETER_MIN_READING);
        }
    }

    #[test]
    fn noise_is_small_and_two_sided() {
        let mut sensor = speedometer(11);
        let readings: Vec<f64> = (0..2000).map(|_| sensor.read(30.0)).collect();

        assert!(readings.iter().all(|r| (r - 30.0).abs() < 2.0));
        assert!(readings.iter().any(|&r| r > 30.0));
        assert!(readings.iter().any(|&r| r < 30.0));

        let mean = readings.iter().sum::<f64>() / readings.len() as f64;
        assert!((mean - 30.0).abs() < 0.05);
    }

    #[test]
    fn zero_noise_is_exact() {
        let config = SpeedometerConfig {
            std_dev: 0.0,
            ..SpeedometerConfig::default()
        };
        let mut sensor = Speedometer::new(config, seeded_rng(1)).unwrap();
        assert_eq!(sensor.read(12.5), 12.5);
    }

    #[test]
    fn same_seed_same_readings() {
        let mut a = speedometer(3);
        let mut b = speedometer(3);
        for v in [0.0, 5.0, 30.0, 79.9] {
            assert_eq!(a.read(v), b.read(v));
        }
    }

    #[test]
    fn invalid_configs_rejected() {
        let inverted = SpeedometerConfig {
            min_reading: 80.0,
            max_reading: 0.0,
            ..SpeedometerConfig::default()
        };
        assert!(Speedometer::new(inverted, seeded_rng(0)).is_err());

        let negative_std = SpeedometerConfig {
            std_dev: -0.1,
            ..SpeedometerConfig::default()
        };
        assert!(Speedometer::new(negative_std, seeded_rng(0)).is_err());
    }
}
