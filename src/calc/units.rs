//! Unit conversion and numeric helpers shared by the calculators

use super::{CalcError, CalcResult};

/// Centimeters per meter
pub const CM_PER_M: f64 = 100.0;

/// Convert a length in centimeters to meters
pub fn cm_to_m(cm: f64) -> f64 {
    cm / CM_PER_M
}

/// Round to 2 decimal places (half away from zero)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Unwrap an optional field, reporting which one is missing
pub fn require(field: &'static str, value: Option<f64>) -> CalcResult<f64> {
    value.ok_or(CalcError::IncompleteInputSet(field))
}

/// Unwrap an optional field that must be a finite, strictly positive number
pub fn require_positive(field: &'static str, value: Option<f64>) -> CalcResult<f64> {
    let v = require(field, value)?;
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(CalcError::InvalidInput { field, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cm_to_m() {
        assert!((cm_to_m(170.0) - 1.7).abs() < 1e-12);
        assert!((cm_to_m(100.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(24.394463), 24.39);
        assert_eq!(round2(0.9), 0.9);
        assert_eq!(round2(1.005_000_1), 1.01);
        assert_eq!(round2(10.0), 10.0);
    }

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("weight", Some(70.0)), Ok(70.0));
        assert_eq!(
            require_positive("weight", None),
            Err(CalcError::IncompleteInputSet("weight"))
        );
        assert_eq!(
            require_positive("height", Some(0.0)),
            Err(CalcError::InvalidInput { field: "height", value: 0.0 })
        );
        assert!(require_positive("height", Some(f64::NAN)).is_err());
        assert!(require_positive("height", Some(-5.0)).is_err());
    }
}
