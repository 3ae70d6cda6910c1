//! Smoking exposure (pack-years)

use serde::{Deserialize, Serialize};

use super::units::round2;

/// Cigarettes in one pack
pub const CIGARETTES_PER_PACK: f64 = 20.0;

/// Smoking status as recorded on the intake form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingStatus {
    Never,
    Current,
    Former,
}

impl SmokingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmokingStatus::Never => "never",
            SmokingStatus::Current => "current",
            SmokingStatus::Former => "former",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "never" | "nunca" => Some(SmokingStatus::Never),
            "current" | "smoker" | "fumante" => Some(SmokingStatus::Current),
            "former" | "ex-smoker" | "ex-fumante" => Some(SmokingStatus::Former),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SmokingStatus::Never => "Never smoked",
            SmokingStatus::Current => "Current smoker",
            SmokingStatus::Former => "Former smoker",
        }
    }
}

/// Smoking section of the intake form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokingProfile {
    pub status: SmokingStatus,
    pub start_age: Option<f64>,
    pub cigarettes_per_day: Option<f64>,
    pub quit_age: Option<f64>,
}

impl Default for SmokingProfile {
    fn default() -> Self {
        Self {
            status: SmokingStatus::Never,
            start_age: None,
            cigarettes_per_day: None,
            quit_age: None,
        }
    }
}

/// Years smoked for the given status.
///
/// Current smokers count up to their current age, former smokers up to the age
/// they quit. Returns None for never-smokers or when either age is missing.
pub fn years_smoked(
    status: SmokingStatus,
    start_age: Option<f64>,
    current_age: Option<f64>,
    quit_age: Option<f64>,
) -> Option<f64> {
    let end_age = match status {
        SmokingStatus::Never => return None,
        SmokingStatus::Current => current_age?,
        SmokingStatus::Former => quit_age?,
    };
    Some(end_age - start_age?)
}

/// Pack-years = (cigarettes per day / 20) × years smoked, rounded to 2 decimals.
///
/// None unless both inputs are present and years smoked is positive.
pub fn compute_pack_years(cigarettes_per_day: Option<f64>, years_smoked: Option<f64>) -> Option<f64> {
    let per_day = cigarettes_per_day.filter(|c| c.is_finite() && *c >= 0.0)?;
    let years = years_smoked.filter(|y| y.is_finite() && *y > 0.0)?;
    Some(round2((per_day / CIGARETTES_PER_PACK) * years))
}

/// Pack-years for a full smoking profile, given the respondent's age
pub fn resolve_pack_years(profile: &SmokingProfile, current_age: Option<f64>) -> Option<f64> {
    let years = years_smoked(profile.status, profile.start_age, current_age, profile.quit_age);
    compute_pack_years(profile.cigarettes_per_day, years)
}
