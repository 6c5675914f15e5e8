//! Scenario schema definitions.

use cc_controls::{EngineControlUnit, SpeedometerConfig};
use cc_road::{InclinationConfig, SegmentedProfileConfig};
use cc_vehicle::{P_SUA, VehicleParams};
use serde::{Deserialize, Serialize};

use crate::migrate::LATEST_VERSION;

/// One simulation run, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    /// Absent in version 0 files; migration fills it in.
    #[serde(default)]
    pub name: String,
    pub vehicle: VehicleParams,
    pub controller: EngineControlUnit,
    #[serde(default)]
    pub sensor: SpeedometerConfig,
    #[serde(default)]
    pub faults: FaultDef,
    pub simulation: SimulationDef,
    #[serde(default)]
    pub road: RoadDef,
    /// Fixed seed for every random stream; fresh entropy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for Scenario {
    /// Camry XSE 2025 cruising at 108 km/h on a flat road.
    fn default() -> Self {
        Self {
            version: LATEST_VERSION,
            name: "Camry XSE 2025 cruise".to_string(),
            vehicle: VehicleParams::camry_xse_2025(),
            controller: EngineControlUnit {
                kp: 0.5,
                ki: 0.2,
                kd: 1.0,
                windup_protection: false,
            },
            sensor: SpeedometerConfig::default(),
            faults: FaultDef::default(),
            simulation: SimulationDef::default(),
            road: RoadDef::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaultDef {
    /// Per-tick probability of sudden unintended acceleration.
    #[serde(default = "default_sua_probability")]
    pub sua_probability: f64,
}

fn default_sua_probability() -> f64 {
    P_SUA
}

impl Default for FaultDef {
    fn default() -> Self {
        Self {
            sua_probability: P_SUA,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationDef {
    pub target_speed_kph: f64,
    #[serde(default)]
    pub initial_speed_kph: f64,
    pub total_ticks: usize,
    pub dt_s: f64,
    #[serde(default = "default_rolling_friction")]
    pub rolling_friction: f64,
}

fn default_rolling_friction() -> f64 {
    cc_vehicle::DEFAULT_ROLLING_FRICTION
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            target_speed_kph: 108.0,
            initial_speed_kph: 0.0,
            total_ticks: 3_600,
            dt_s: 1.0,
            rolling_friction: default_rolling_friction(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoadDef {
    #[default]
    Flat,
    Random {
        #[serde(flatten)]
        config: InclinationConfig,
    },
    Segmented {
        #[serde(flatten)]
        config: SegmentedProfileConfig,
    },
}

impl RoadDef {
    pub fn kind_name(&self) -> &'static str {
        match self {
            RoadDef::Flat => "flat",
            RoadDef::Random { .. } => "random",
            RoadDef::Segmented { .. } => "segmented",
        }
    }
}
