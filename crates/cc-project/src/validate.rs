//! Scenario validation logic.

use crate::schema::{RoadDef, Scenario};

/// Cruise set points the controller is specified for (km/h).
pub const TARGET_SPEED_RANGE_KPH: std::ops::RangeInclusive<f64> = 30.0..=130.0;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid {section}: {message}")]
    Section {
        section: &'static str,
        message: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn section(section: &'static str, err: impl std::fmt::Display) -> ValidationError {
    ValidationError::Section {
        section,
        message: err.to_string(),
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if scenario.name.trim().is_empty() {
        return Err(invalid("name", "", "must not be empty"));
    }

    scenario.vehicle.validate().map_err(|e| section("vehicle", e))?;
    scenario
        .controller
        .validate()
        .map_err(|e| section("controller", e))?;
    scenario.sensor.validate().map_err(|e| section("sensor", e))?;

    let p = scenario.faults.sua_probability;
    if !(0.0..=1.0).contains(&p) {
        return Err(invalid("faults.sua_probability", p, "must be within [0, 1]"));
    }

    let sim = &scenario.simulation;
    if !TARGET_SPEED_RANGE_KPH.contains(&sim.target_speed_kph) {
        return Err(invalid(
            "simulation.target_speed_kph",
            sim.target_speed_kph,
            "must be within [30, 130] km/h",
        ));
    }
    if !sim.initial_speed_kph.is_finite() || sim.initial_speed_kph < 0.0 {
        return Err(invalid(
            "simulation.initial_speed_kph",
            sim.initial_speed_kph,
            "must be finite and non-negative",
        ));
    }
    if sim.total_ticks == 0 {
        return Err(invalid("simulation.total_ticks", 0, "must be positive"));
    }
    if !sim.dt_s.is_finite() || sim.dt_s <= 0.0 {
        return Err(invalid("simulation.dt_s", sim.dt_s, "must be positive"));
    }
    if !sim.rolling_friction.is_finite() || sim.rolling_friction < 0.0 {
        return Err(invalid(
            "simulation.rolling_friction",
            sim.rolling_friction,
            "must be finite and non-negative",
        ));
    }

    match &scenario.road {
        RoadDef::Flat => {}
        RoadDef::Random { config } => config.validate().map_err(|e| section("road", e))?,
        RoadDef::Segmented { config } => config.validate().map_err(|e| section("road", e))?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_road::InclinationConfig;

    #[test]
    fn default_scenario_is_valid() {
        validate_scenario(&Scenario::default()).unwrap();
    }

    #[test]
    fn target_speed_outside_range_rejected() {
        for kph in [29.9, 130.1, f64::NAN] {
            let mut scenario = Scenario::default();
            scenario.simulation.target_speed_kph = kph;
            assert!(validate_scenario(&scenario).is_err(), "{kph}");
        }
        let mut scenario = Scenario::default();
        scenario.simulation.target_speed_kph = 30.0;
        validate_scenario(&scenario).unwrap();
    }

    #[test]
    fn negative_gain_rejected() {
        let mut scenario = Scenario::default();
        scenario.controller.ki = -0.1;
        let err = validate_scenario(&scenario).unwrap_err();
        assert!(matches!(err, ValidationError::Section { section: "controller", .. }));
    }

    #[test]
    fn bad_simulation_values_rejected() {
        let mut scenario = Scenario::default();
        scenario.simulation.dt_s = 0.0;
        assert!(validate_scenario(&scenario).is_err());

        let mut scenario = Scenario::default();
        scenario.simulation.total_ticks = 0;
        assert!(validate_scenario(&scenario).is_err());

        let mut scenario = Scenario::default();
        scenario.faults.sua_probability = 1.5;
        assert!(validate_scenario(&scenario).is_err());
    }

    #[test]
    fn road_config_checked() {
        let mut scenario = Scenario::default();
        scenario.road = RoadDef::Random {
            config: InclinationConfig {
                theta_max_deg: -1.0,
                ..InclinationConfig::default()
            },
        };
        let err = validate_scenario(&scenario).unwrap_err();
        assert!(matches!(err, ValidationError::Section { section: "road", .. }));
    }

    #[test]
    fn future_version_rejected() {
        let scenario = Scenario {
            version: crate::migrate::LATEST_VERSION + 1,
            ..Scenario::default()
        };
        assert!(matches!(
            validate_scenario(&scenario),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }
}
