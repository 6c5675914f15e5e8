//! Vehicle parameters and dynamic state.

use crate::error::{VehicleError, VehicleResult};
use cc_core::{ensure_non_negative, ensure_positive, units::kph_to_mps};
use serde::{Deserialize, Serialize};

/// Gear ratios of an eight-speed automatic, first gear first.
pub const DEFAULT_GEAR_RATIOS: [f64; 8] = [5.25, 3.03, 1.95, 1.46, 1.22, 1.0, 0.81, 0.67];
/// Wheel radius (m).
pub const DEFAULT_WHEEL_RADIUS_M: f64 = 0.3355;

fn default_gear_ratios() -> Vec<f64> {
    DEFAULT_GEAR_RATIOS.to_vec()
}

fn default_wheel_radius() -> f64 {
    DEFAULT_WHEEL_RADIUS_M
}

/// Speed band in which a gear is meant to operate (km/h).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearRange {
    pub low_kph: f64,
    pub high_kph: f64,
}

impl GearRange {
    pub const fn new(low_kph: f64, high_kph: f64) -> Self {
        Self { low_kph, high_kph }
    }

    /// Lower bound in m/s.
    pub fn low_mps(&self) -> f64 {
        kph_to_mps(self.low_kph)
    }

    /// Upper bound in m/s.
    pub fn high_mps(&self) -> f64 {
        kph_to_mps(self.high_kph)
    }

    /// Strictly inside the band (bounds excluded).
    pub fn contains_mps(&self, speed: f64) -> bool {
        self.low_mps() < speed && speed < self.high_mps()
    }
}

/// Static vehicle description, immutable during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleParams {
    /// Vehicle mass (kg)
    pub mass_kg: f64,
    /// Aerodynamic drag coefficient (dimensionless)
    pub drag_coefficient: f64,
    /// Frontal area (m²)
    pub frontal_area_m2: f64,
    /// Peak motor torque (N·m)
    pub torque_max_nm: f64,
    /// Motor speed at peak torque (rad/s)
    pub omega_max_rad_s: f64,
    /// Operating speed band per gear (km/h)
    pub gear_speed_ranges: Vec<GearRange>,
    /// Overall ratio per gear (dimensionless)
    #[serde(default = "default_gear_ratios")]
    pub gear_ratios: Vec<f64>,
    /// Wheel radius (m)
    #[serde(default = "default_wheel_radius")]
    pub wheel_radius_m: f64,
}

impl VehicleParams {
    /// Toyota Camry XSE 2025.
    pub fn camry_xse_2025() -> Self {
        Self {
            mass_kg: 1_604.0,
            drag_coefficient: 0.28,
            frontal_area_m2: 1.94,
            torque_max_nm: 221.0,
            omega_max_rad_s: 545.3,
            gear_speed_ranges: vec![
                GearRange::new(0.0, 10.0),
                GearRange::new(10.0, 30.0),
                GearRange::new(30.0, 50.0),
                GearRange::new(50.0, 70.0),
                GearRange::new(70.0, 100.0),
                GearRange::new(100.0, 130.0),
                GearRange::new(130.0, 160.0),
                GearRange::new(160.0, 200.0),
            ],
            gear_ratios: default_gear_ratios(),
            wheel_radius_m: DEFAULT_WHEEL_RADIUS_M,
        }
    }

    pub fn gear_count(&self) -> usize {
        self.gear_ratios.len()
    }

    pub fn validate(&self) -> VehicleResult<()> {
        ensure_positive(self.mass_kg, "mass_kg")?;
        ensure_positive(self.drag_coefficient, "drag_coefficient")?;
        ensure_positive(self.frontal_area_m2, "frontal_area_m2")?;
        ensure_positive(self.torque_max_nm, "torque_max_nm")?;
        ensure_positive(self.omega_max_rad_s, "omega_max_rad_s")?;
        ensure_positive(self.wheel_radius_m, "wheel_radius_m")?;

        if self.gear_ratios.is_empty() {
            return Err(VehicleError::InvalidArg {
                what: "vehicle needs at least one gear",
            });
        }
        if self.gear_speed_ranges.len() != self.gear_ratios.len() {
            return Err(VehicleError::GearMismatch {
                ranges: self.gear_speed_ranges.len(),
                ratios: self.gear_ratios.len(),
            });
        }
        for &ratio in &self.gear_ratios {
            ensure_positive(ratio, "gear ratio")?;
        }
        for range in &self.gear_speed_ranges {
            ensure_non_negative(range.low_kph, "gear range low_kph")?;
            ensure_positive(range.high_kph, "gear range high_kph")?;
            if range.low_kph >= range.high_kph {
                return Err(VehicleError::InvalidArg {
                    what: "gear range low must be below high",
                });
            }
        }
        Ok(())
    }
}

/// Dynamic state advanced every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleState {
    /// Distance travelled (m)
    pub position_m: f64,
    /// Longitudinal speed (m/s, signed)
    pub speed_mps: f64,
    /// Engaged gear, 1-based
    pub gear: usize,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            position_m: 0.0,
            speed_mps: 0.0,
            gear: 1,
        }
    }
}

/// Parameters plus state. Always holds `1 <= gear <= gear_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    params: VehicleParams,
    pub(crate) state: VehicleState,
}

impl Vehicle {
    /// Validate `params` and place the vehicle at rest in first gear.
    pub fn new(params: VehicleParams) -> VehicleResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            state: VehicleState::default(),
        })
    }

    /// Start in a specific gear.
    pub fn with_gear(mut self, gear: usize) -> VehicleResult<Self> {
        let count = self.params.gear_count();
        if gear == 0 || gear > count {
            return Err(VehicleError::GearOutOfRange { gear, count });
        }
        self.state.gear = gear;
        Ok(self)
    }

    /// Copy of this vehicle positioned at the origin with the given speed.
    /// The engaged gear is carried over.
    pub fn fresh_copy(&self, initial_speed_mps: f64) -> Self {
        Self {
            params: self.params.clone(),
            state: VehicleState {
                position_m: 0.0,
                speed_mps: initial_speed_mps,
                gear: self.state.gear,
            },
        }
    }

    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn speed(&self) -> f64 {
        self.state.speed_mps
    }

    pub fn position(&self) -> f64 {
        self.state.position_m
    }

    pub fn gear(&self) -> usize {
        self.state.gear
    }

    /// Ratio of the engaged gear.
    pub fn gear_ratio(&self) -> f64 {
        self.params.gear_ratios[self.state.gear - 1]
    }

    /// Engage `gear`, clamped to the available gears.
    pub fn engage_gear(&mut self, gear: usize) {
        debug_assert!(gear >= 1 && gear <= self.params.gear_count());
        self.state.gear = gear.clamp(1, self.params.gear_count());
    }
}
