//! Body metrics: BMI, BMI classification and waist-hip ratio

use serde::{Deserialize, Serialize};

use super::units::{cm_to_m, require, require_positive, round2};
use super::{CalcError, CalcResult};

/// BMI classification buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiStatus {
    Underweight,
    Normal,
    Overweight,
    ObeseI,
    ObeseII,
    ObeseIII,
}

impl BmiStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BmiStatus::Underweight => "underweight",
            BmiStatus::Normal => "normal",
            BmiStatus::Overweight => "overweight",
            BmiStatus::ObeseI => "obese_i",
            BmiStatus::ObeseII => "obese_ii",
            BmiStatus::ObeseIII => "obese_iii",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "underweight" => Some(BmiStatus::Underweight),
            "normal" => Some(BmiStatus::Normal),
            "overweight" => Some(BmiStatus::Overweight),
            "obese_i" => Some(BmiStatus::ObeseI),
            "obese_ii" => Some(BmiStatus::ObeseII),
            "obese_iii" => Some(BmiStatus::ObeseIII),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BmiStatus::Underweight => "Underweight",
            BmiStatus::Normal => "Normal",
            BmiStatus::Overweight => "Overweight",
            BmiStatus::ObeseI => "Obese-I",
            BmiStatus::ObeseII => "Obese-II",
            BmiStatus::ObeseIII => "Obese-III",
        }
    }
}

/// BMI value with its classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub bmi: f64,
    pub status: BmiStatus,
}

/// Everything derivable from the anthropometric section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyMetrics {
    pub bmi: Option<f64>,
    pub bmi_status: Option<BmiStatus>,
    pub waist_hip_ratio: Option<f64>,
}

/// BMI = weight / height_m², rounded to 2 decimals.
///
/// Both inputs must be finite and strictly positive.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> CalcResult<BmiResult> {
    let weight = require_positive("weight", Some(weight_kg))?;
    let height_m = cm_to_m(require_positive("height", Some(height_cm))?);

    let bmi = round2(weight / (height_m * height_m));
    Ok(BmiResult {
        bmi,
        status: classify_bmi(bmi),
    })
}

/// Classify a BMI value.
///
/// Cutoffs are on the 2-decimal value, so 24.9 is still Normal and 25.0 is
/// Overweight.
pub fn classify_bmi(bmi: f64) -> BmiStatus {
    if bmi < 18.5 {
        BmiStatus::Underweight
    } else if bmi < 25.0 {
        BmiStatus::Normal
    } else if bmi < 30.0 {
        BmiStatus::Overweight
    } else if bmi < 35.0 {
        BmiStatus::ObeseI
    } else if bmi < 40.0 {
        BmiStatus::ObeseII
    } else {
        BmiStatus::ObeseIII
    }
}

/// Waist / hip, rounded to 2 decimals. Hip must be strictly positive.
pub fn compute_waist_hip_ratio(waist_cm: f64, hip_cm: f64) -> CalcResult<f64> {
    let hip = require_positive("hip_circumference", Some(hip_cm))?;
    if !waist_cm.is_finite() || waist_cm < 0.0 {
        return Err(CalcError::InvalidInput {
            field: "waist_circumference",
            value: waist_cm,
        });
    }
    Ok(round2(waist_cm / hip))
}

/// Compute whichever body metrics the supplied fields allow.
///
/// BMI and waist-hip ratio are independent: a missing hip measurement leaves
/// the ratio unset without affecting BMI.
pub fn compute_body_metrics(
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    waist_cm: Option<f64>,
    hip_cm: Option<f64>,
) -> BodyMetrics {
    let bmi = require("weight", weight_kg)
        .and_then(|w| require("height", height_cm).map(|h| (w, h)))
        .and_then(|(w, h)| compute_bmi(w, h))
        .ok();

    let waist_hip_ratio = require("waist_circumference", waist_cm)
        .and_then(|w| require("hip_circumference", hip_cm).map(|h| (w, h)))
        .and_then(|(w, h)| compute_waist_hip_ratio(w, h))
        .ok();

    BodyMetrics {
        bmi: bmi.map(|b| b.bmi),
        bmi_status: bmi.map(|b| b.status),
        waist_hip_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_bmi() {
        let result = compute_bmi(70.5, 170.0).unwrap();
        assert_eq!(result.bmi, 24.39);
        assert_eq!(result.status, BmiStatus::Normal);
    }

    #[test]
    fn test_compute_bmi_rejects_non_positive() {
        assert_eq!(
            compute_bmi(70.0, 0.0),
            Err(CalcError::InvalidInput { field: "height", value: 0.0 })
        );
        assert!(compute_bmi(0.0, 170.0).is_err());
        assert!(compute_bmi(-1.0, 170.0).is_err());
        assert!(compute_bmi(70.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_classify_bmi_boundaries() {
        assert_eq!(classify_bmi(0.0), BmiStatus::Underweight);
        assert_eq!(classify_bmi(18.49), BmiStatus::Underweight);
        assert_eq!(classify_bmi(18.5), BmiStatus::Normal);
        assert_eq!(classify_bmi(24.9), BmiStatus::Normal);
        assert_eq!(classify_bmi(25.0), BmiStatus::Overweight);
        assert_eq!(classify_bmi(29.9), BmiStatus::Overweight);
        assert_eq!(classify_bmi(30.0), BmiStatus::ObeseI);
        assert_eq!(classify_bmi(34.9), BmiStatus::ObeseI);
        assert_eq!(classify_bmi(35.0), BmiStatus::ObeseII);
        assert_eq!(classify_bmi(39.9), BmiStatus::ObeseII);
        assert_eq!(classify_bmi(40.0), BmiStatus::ObeseIII);
        assert_eq!(classify_bmi(55.0), BmiStatus::ObeseIII);
    }

    #[test]
    fn test_waist_hip_ratio() {
        assert_eq!(compute_waist_hip_ratio(85.5, 95.0), Ok(0.9));
        // Scaling both measurements leaves the ratio unchanged
        assert_eq!(compute_waist_hip_ratio(171.0, 190.0), Ok(0.9));
        assert!(compute_waist_hip_ratio(85.0, 0.0).is_err());
    }

    #[test]
    fn test_body_metrics_partial_inputs() {
        let metrics = compute_body_metrics(Some(70.5), Some(170.0), Some(85.5), None);
        assert_eq!(metrics.bmi, Some(24.39));
        assert_eq!(metrics.bmi_status, Some(BmiStatus::Normal));
        assert_eq!(metrics.waist_hip_ratio, None);

        let metrics = compute_body_metrics(None, Some(170.0), Some(85.5), Some(95.0));
        assert_eq!(metrics.bmi, None);
        assert_eq!(metrics.bmi_status, None);
        assert_eq!(metrics.waist_hip_ratio, Some(0.9));
    }
}
