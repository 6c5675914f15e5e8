//! Scalar helpers shared by the model crates.

use crate::CoreError;

/// Sign of `v` as -1, 0 or 1. Zero maps to zero so that a vehicle at rest
/// feels no rolling resistance.
pub fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: f64, what: &'static str) -> Result<f64, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::OutOfRange { what, value: v })
    }
}

pub fn ensure_non_negative(v: f64, what: &'static str) -> Result<f64, CoreError> {
    let v = ensure_finite(v, what)?;
    if v >= 0.0 {
        Ok(v)
    } else {
        Err(CoreError::OutOfRange { what, value: v })
    }
}

/// Probability in the closed unit interval.
pub fn ensure_probability(p: f64, what: &'static str) -> Result<f64, CoreError> {
    let p = ensure_finite(p, what)?;
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(CoreError::OutOfRange { what, value: p })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(3.2), 1.0);
        assert_eq!(sign(-1e-9), -1.0);
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(f64::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(0.0, "mass").is_err());
        assert!(ensure_positive(-1.0, "mass").is_err());
        assert_eq!(ensure_positive(1604.0, "mass").unwrap(), 1604.0);
    }

    #[test]
    fn probability_bounds() {
        assert!(ensure_probability(0.0, "p").is_ok());
        assert!(ensure_probability(1.0, "p").is_ok());
        assert!(ensure_probability(1.01, "p").is_err());
        assert!(ensure_probability(-0.1, "p").is_err());
    }
}
