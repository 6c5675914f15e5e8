//! Recorded trajectory of a run and summary statistics over it.

use cc_core::units::mps_to_kph;
use serde::{Deserialize, Serialize};

/// Parallel per-tick series, index-aligned. Speeds and errors are in km/h.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Tick duration (seconds)
    pub dt: f64,
    pub tick: Vec<usize>,
    /// Tracking error seen by the ECU (km/h)
    pub error_kph: Vec<f64>,
    /// True speed after the plant step (km/h)
    pub speed_kph: Vec<f64>,
    /// Gear engaged for the step
    pub gear: Vec<usize>,
    /// Throttle command in `[-1, 1]`
    pub throttle: Vec<f64>,
    /// Speedometer reading (km/h)
    pub speedometer_kph: Vec<f64>,
    /// Road grade (degrees)
    pub inclination_deg: Vec<f64>,
}

/// One tick of a [`SimulationResult`], for row-oriented consumers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleRow {
    pub tick: usize,
    pub time_s: f64,
    pub error_kph: f64,
    pub speed_kph: f64,
    pub gear: usize,
    pub throttle: f64,
    pub speedometer_kph: f64,
    pub inclination_deg: f64,
}

/// Descriptive statistics of one series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1), 0 for fewer than two values.
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl SeriesStats {
    /// `None` for an empty series.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len();
        let mean = values.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        } else {
            0.0
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            count: n,
            mean,
            std,
            min: sorted[0],
            p25: quantile(&sorted, 0.25),
            p50: quantile(&sorted, 0.5),
            p75: quantile(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }
}

/// Linear interpolation between closest ranks on sorted, non-empty data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// [`SeriesStats`] for every numeric series of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub error_kph: SeriesStats,
    pub speed_kph: SeriesStats,
    pub gear: SeriesStats,
    pub throttle: SeriesStats,
    pub speedometer_kph: SeriesStats,
    pub inclination_deg: SeriesStats,
}

impl SimulationResult {
    pub fn with_capacity(dt: f64, ticks: usize) -> Self {
        Self {
            dt,
            tick: Vec::with_capacity(ticks),
            error_kph: Vec::with_capacity(ticks),
            speed_kph: Vec::with_capacity(ticks),
            gear: Vec::with_capacity(ticks),
            throttle: Vec::with_capacity(ticks),
            speedometer_kph: Vec::with_capacity(ticks),
            inclination_deg: Vec::with_capacity(ticks),
        }
    }

    /// Append one tick. Speeds and error are given in m/s.
    #[allow(clippy::too_many_arguments)]
    pub fn push(
        &mut self,
        tick: usize,
        error_mps: f64,
        speed_mps: f64,
        gear: usize,
        throttle: f64,
        measured_mps: f64,
        inclination_deg: f64,
    ) {
        self.tick.push(tick);
        self.error_kph.push(mps_to_kph(error_mps));
        self.speed_kph.push(mps_to_kph(speed_mps));
        self.gear.push(gear);
        self.throttle.push(throttle);
        self.speedometer_kph.push(mps_to_kph(measured_mps));
        self.inclination_deg.push(inclination_deg);
    }

    pub fn len(&self) -> usize {
        self.tick.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tick.is_empty()
    }

    pub fn final_speed_kph(&self) -> Option<f64> {
        self.speed_kph.last().copied()
    }

    pub fn row(&self, i: usize) -> Option<SampleRow> {
        Some(SampleRow {
            tick: *self.tick.get(i)?,
            time_s: self.tick[i] as f64 * self.dt,
            error_kph: self.error_kph[i],
            speed_kph: self.speed_kph[i],
            gear: self.gear[i],
            throttle: self.throttle[i],
            speedometer_kph: self.speedometer_kph[i],
            inclination_deg: self.inclination_deg[i],
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = SampleRow> + '_ {
        (0..self.len()).filter_map(|i| self.row(i))
    }

    /// Statistics per series, `None` for an empty result.
    pub fn describe(&self) -> Option<Summary> {
        let gears: Vec<f64> = self.gear.iter().map(|&g| g as f64).collect();
        Some(Summary {
            error_kph: SeriesStats::from_values(&self.error_kph)?,
            speed_kph: SeriesStats::from_values(&self.speed_kph)?,
            gear: SeriesStats::from_values(&gears)?,
            throttle: SeriesStats::from_values(&self.throttle)?,
            speedometer_kph: SeriesStats::from_values(&self.speedometer_kph)?,
            inclination_deg: SeriesStats::from_values(&self.inclination_deg)?,
        })
    }

    /// Share of ticks whose true speed is within `target_kph ± half_width_kph`.
    pub fn fraction_within_band(&self, target_kph: f64, half_width_kph: f64) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let inside = self
            .speed_kph
            .iter()
            .filter(|v| (*v - target_kph).abs() <= half_width_kph)
            .count();
        inside as f64 / self.len() as f64
    }
}
