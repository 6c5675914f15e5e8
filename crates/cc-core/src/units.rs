// cc-core/src/units.rs

use uom::si::f64::{Angle as UomAngle, Velocity as UomVelocity};

// Public canonical unit types (SI, f64)
pub type Angle = UomAngle;
pub type Velocity = UomVelocity;

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn kph(v: f64) -> Velocity {
    use uom::si::velocity::kilometer_per_hour;
    Velocity::new::<kilometer_per_hour>(v)
}

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

#[inline]
pub fn kph_to_mps(v: f64) -> f64 {
    use uom::si::velocity::meter_per_second;
    kph(v).get::<meter_per_second>()
}

#[inline]
pub fn mps_to_kph(v: f64) -> f64 {
    use uom::si::velocity::kilometer_per_hour;
    mps(v).get::<kilometer_per_hour>()
}

#[inline]
pub fn deg_to_rad(v: f64) -> f64 {
    use uom::si::angle::radian;
    deg(v).get::<radian>()
}

pub mod constants {
    /// Standard gravity (m/s²)
    pub const G0_MPS2: f64 = 9.806_65;
    /// Air density at sea level (kg/m³)
    pub const AIR_DENSITY_KG_M3: f64 = 1.225;
}
