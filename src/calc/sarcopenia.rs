//! Sarcopenia classification
//!
//! Estimates the appendicular skeletal muscle mass index (AMMI) with the
//! Lee regression and combines it with grip strength, sit-to-stand and gait
//! speed results to stage sarcopenia.
//!
//! Gait protocol: the gait field is usual walking speed in m/s. A speed at or
//! below 0.8 m/s is slow.

use serde::{Deserialize, Serialize};

use super::demographics::{Race, Sex};
use super::units::{cm_to_m, require_positive, round2};
use super::{CalcError, CalcResult};

/// AMMI below this (kg/m²) is low muscle mass for men
pub const MALE_LOW_AMMI: f64 = 7.0;
/// AMMI below this (kg/m²) is low muscle mass for women
pub const FEMALE_LOW_AMMI: f64 = 5.5;
/// Grip below this (kg) is low strength for men
pub const MALE_LOW_GRIP_KG: f64 = 27.0;
/// Grip below this (kg) is low strength for women
pub const FEMALE_LOW_GRIP_KG: f64 = 16.0;
/// Gait speed at or below this (m/s) is slow
pub const SLOW_GAIT_SPEED_MS: f64 = 0.8;
/// Five-repetition chair stand above this (seconds) is poor
pub const POOR_SIT_TO_STAND_SECS: f64 = 15.0;

/// Sarcopenia stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SarcopeniaStage {
    NoSarcopenia,
    PreSarcopenic,
    Sarcopenic,
    SevereSarcopenic,
}

impl SarcopeniaStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SarcopeniaStage::NoSarcopenia => "no_sarcopenia",
            SarcopeniaStage::PreSarcopenic => "pre_sarcopenic",
            SarcopeniaStage::Sarcopenic => "sarcopenic",
            SarcopeniaStage::SevereSarcopenic => "severe_sarcopenic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "no_sarcopenia" | "none" | "sem_sarcopenia" => Some(SarcopeniaStage::NoSarcopenia),
            "pre_sarcopenic" | "pre_sarcopenica" => Some(SarcopeniaStage::PreSarcopenic),
            "sarcopenic" | "sarcopenica" => Some(SarcopeniaStage::Sarcopenic),
            "severe_sarcopenic" | "severe" | "sarcopenia_grave" => {
                Some(SarcopeniaStage::SevereSarcopenic)
            }
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SarcopeniaStage::NoSarcopenia => "No sarcopenia",
            SarcopeniaStage::PreSarcopenic => "Pre-sarcopenic",
            SarcopeniaStage::Sarcopenic => "Sarcopenic",
            SarcopeniaStage::SevereSarcopenic => "Severe sarcopenia",
        }
    }
}

/// Inputs for the classifier; every field is required
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionalTestInput {
    pub sex: Option<Sex>,
    pub age: Option<f64>,
    pub race: Option<Race>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub hand_grip_kg: Option<f64>,
    pub sit_to_stand_secs: Option<f64>,
    pub gait_speed_ms: Option<f64>,
}

/// The four criteria that drive staging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SarcopeniaFlags {
    pub low_muscle_mass: bool,
    pub low_grip_strength: bool,
    pub slow_gait: bool,
    pub poor_sit_to_stand: bool,
}

/// Full classifier output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarcopeniaAssessment {
    /// kg/m², rounded to 2 decimals
    pub ammi: f64,
    pub flags: SarcopeniaFlags,
    pub stage: SarcopeniaStage,
}

fn race_adjustment(race: Race) -> f64 {
    match race {
        Race::White => 0.0,
        Race::Black => 1.4,
        Race::Mixed | Race::Asian | Race::Indigenous => -1.2,
    }
}

/// Appendicular skeletal muscle mass index, kg/m² (unrounded)
///
/// ```text
/// ASM  = 0.244·weight + 7.8·height_m + 6.6·sex − 0.098·age + race − 3.3
/// AMMI = ASM / height_m²
/// ```
pub fn compute_ammi(weight_kg: f64, height_cm: f64, sex: Sex, age: f64, race: Race) -> f64 {
    let height_m = cm_to_m(height_cm);
    let sex_coefficient = match sex {
        Sex::Male => 1.0,
        Sex::Female => 0.0,
    };

    let asm = (0.244 * weight_kg) + (7.8 * height_m) + (6.6 * sex_coefficient) - (0.098 * age)
        + (race_adjustment(race) - 3.3);
    asm / (height_m * height_m)
}

/// Evaluate the four criteria against sex-specific cutoffs
pub fn assess_flags(
    ammi: f64,
    sex: Sex,
    hand_grip_kg: f64,
    sit_to_stand_secs: f64,
    gait_speed_ms: f64,
) -> SarcopeniaFlags {
    let (ammi_cut, grip_cut) = match sex {
        Sex::Male => (MALE_LOW_AMMI, MALE_LOW_GRIP_KG),
        Sex::Female => (FEMALE_LOW_AMMI, FEMALE_LOW_GRIP_KG),
    };

    SarcopeniaFlags {
        low_muscle_mass: ammi < ammi_cut,
        low_grip_strength: hand_grip_kg < grip_cut,
        slow_gait: gait_speed_ms <= SLOW_GAIT_SPEED_MS,
        poor_sit_to_stand: sit_to_stand_secs > POOR_SIT_TO_STAND_SECS,
    }
}

type StageRule = (fn(&SarcopeniaFlags) -> bool, SarcopeniaStage);

fn adequate_muscle_mass(f: &SarcopeniaFlags) -> bool {
    !f.low_muscle_mass
}

fn function_preserved(f: &SarcopeniaFlags) -> bool {
    !f.low_grip_strength && !f.poor_sit_to_stand && !f.slow_gait
}

fn slow_gait(f: &SarcopeniaFlags) -> bool {
    f.slow_gait
}

fn otherwise(_: &SarcopeniaFlags) -> bool {
    true
}

/// Ordered decision table; the first matching rule wins.
///
/// Rules after the first only see low muscle mass.
const STAGE_RULES: [StageRule; 4] = [
    (adequate_muscle_mass, SarcopeniaStage::NoSarcopenia),
    (function_preserved, SarcopeniaStage::PreSarcopenic),
    (slow_gait, SarcopeniaStage::SevereSarcopenic),
    (otherwise, SarcopeniaStage::Sarcopenic),
];

/// Stage from flags, by the first matching rule in the decision table
pub fn classify_stage(flags: &SarcopeniaFlags) -> SarcopeniaStage {
    STAGE_RULES
        .iter()
        .find(|(applies, _)| applies(flags))
        .map(|(_, stage)| *stage)
        .unwrap_or(SarcopeniaStage::Sarcopenic)
}

/// Classify a respondent; fails if any input is missing or not positive
pub fn try_assess_sarcopenia(input: &FunctionalTestInput) -> CalcResult<SarcopeniaAssessment> {
    let sex = input.sex.ok_or(CalcError::IncompleteInputSet("sex"))?;
    let race = input.race.ok_or(CalcError::IncompleteInputSet("race"))?;
    let age = require_positive("age", input.age)?;
    let weight = require_positive("weight", input.weight_kg)?;
    let height = require_positive("height", input.height_cm)?;
    let grip = require_positive("hand_grip", input.hand_grip_kg)?;
    let sit_to_stand = require_positive("sit_to_stand", input.sit_to_stand_secs)?;
    let gait = require_positive("gait_speed", input.gait_speed_ms)?;

    let ammi = compute_ammi(weight, height, sex, age, race);
    let flags = assess_flags(ammi, sex, grip, sit_to_stand, gait);

    Ok(SarcopeniaAssessment {
        ammi: round2(ammi),
        flags,
        stage: classify_stage(&flags),
    })
}

/// Classify a respondent, or None while any required input is missing
pub fn assess_sarcopenia(input: &FunctionalTestInput) -> Option<SarcopeniaAssessment> {
    try_assess_sarcopenia(input).ok()
}
