//! Calculator MCP Tools
//!
//! Stateless tools that run a single calculator over loose arguments, for
//! checking one section of the form without saving anything.

use serde::Serialize;

use crate::calc::{
    self, ActivityBout, ActivitySummary, AlcoholProfile, AlcoholStatus, CalcError,
    FunctionalTestInput, Race, SarcFResponses, SarcopeniaFlags, Sex, SmokingProfile,
    SmokingStatus,
};

pub(crate) fn parse_sex(value: &str) -> Result<Sex, String> {
    Sex::from_str(value)
        .ok_or_else(|| format!("Invalid sex: '{}'. Valid values: male, female", value))
}

pub(crate) fn parse_race(value: &str) -> Result<Race, String> {
    Race::from_str(value).ok_or_else(|| {
        format!(
            "Invalid race: '{}'. Valid values: white, black, mixed, asian, indigenous",
            value
        )
    })
}

pub(crate) fn parse_smoking_status(value: &str) -> Result<SmokingStatus, String> {
    SmokingStatus::from_str(value).ok_or_else(|| {
        format!(
            "Invalid smoking status: '{}'. Valid values: never, current, former",
            value
        )
    })
}

pub(crate) fn parse_alcohol_status(value: &str) -> Result<AlcoholStatus, String> {
    AlcoholStatus::from_str(value).ok_or_else(|| {
        format!(
            "Invalid alcohol status: '{}'. Valid values: never, former_drinker, current_drinker",
            value
        )
    })
}

fn calc_error(e: CalcError) -> String {
    match e {
        CalcError::InvalidInput { field, value } => {
            format!("{} must be a positive number (got {})", field, value)
        }
        CalcError::IncompleteInputSet(field) => format!("{} is required", field),
    }
}

/// Response for compute_body_metrics
#[derive(Debug, Serialize)]
pub struct BodyMetricsResponse {
    pub bmi: Option<f64>,
    pub bmi_status: Option<String>,
    pub bmi_status_display: Option<String>,
    pub waist_hip_ratio: Option<f64>,
}

/// BMI and waist-hip ratio.
///
/// Either pair may be omitted, but a pair that is supplied must be valid.
pub fn compute_body_metrics(
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    waist_cm: Option<f64>,
    hip_cm: Option<f64>,
) -> Result<BodyMetricsResponse, String> {
    let bmi = match (weight_kg, height_cm) {
        (Some(w), Some(h)) => Some(calc::compute_bmi(w, h).map_err(calc_error)?),
        _ => None,
    };
    let waist_hip_ratio = match (waist_cm, hip_cm) {
        (Some(w), Some(h)) => Some(calc::compute_waist_hip_ratio(w, h).map_err(calc_error)?),
        _ => None,
    };

    Ok(BodyMetricsResponse {
        bmi: bmi.map(|b| b.bmi),
        bmi_status: bmi.map(|b| b.status.as_str().to_string()),
        bmi_status_display: bmi.map(|b| b.status.display_name().to_string()),
        waist_hip_ratio,
    })
}

/// Response for compute_smoking_exposure
#[derive(Debug, Serialize)]
pub struct SmokingExposureResponse {
    pub status: String,
    pub years_smoked: Option<f64>,
    pub pack_years: Option<f64>,
}

pub fn compute_smoking_exposure(
    status: &str,
    current_age: Option<f64>,
    start_age: Option<f64>,
    cigarettes_per_day: Option<f64>,
    quit_age: Option<f64>,
) -> Result<SmokingExposureResponse, String> {
    let profile = SmokingProfile {
        status: parse_smoking_status(status)?,
        start_age,
        cigarettes_per_day,
        quit_age,
    };

    Ok(SmokingExposureResponse {
        status: profile.status.as_str().to_string(),
        years_smoked: calc::years_smoked(profile.status, start_age, current_age, quit_age),
        pack_years: calc::resolve_pack_years(&profile, current_age),
    })
}

/// Response for resolve_alcohol_profile
#[derive(Debug, Serialize)]
pub struct AlcoholProfileResponse {
    pub risk_tier: Option<String>,
    pub risk_tier_display: Option<String>,
    pub weekly_standard_drinks: Option<f64>,
    pub harmful_limit: Option<f64>,
    /// Profile to store; sub-fields are cleared for never-drinkers
    pub profile: AlcoholProfile,
}

pub fn resolve_alcohol_profile(
    sex: Option<&str>,
    profile: AlcoholProfile,
) -> Result<AlcoholProfileResponse, String> {
    let sex = sex.map(parse_sex).transpose()?;
    let resolution = calc::resolve_alcohol_profile(&profile, sex);

    Ok(AlcoholProfileResponse {
        risk_tier: resolution.risk_tier.map(|t| t.as_str().to_string()),
        risk_tier_display: resolution.risk_tier.map(|t| t.display_name().to_string()),
        weekly_standard_drinks: resolution.weekly_standard_drinks,
        harmful_limit: sex.map(|s| match s {
            Sex::Female => calc::alcohol::FEMALE_HARMFUL_LIMIT,
            Sex::Male => calc::alcohol::MALE_HARMFUL_LIMIT,
        }),
        profile: resolution.profile,
    })
}

/// Response for classify_sarcopenia
#[derive(Debug, Serialize)]
pub struct SarcopeniaResponse {
    pub ammi: f64,
    pub flags: SarcopeniaFlags,
    pub stage: String,
    pub stage_display: String,
}

#[allow(clippy::too_many_arguments)]
pub fn classify_sarcopenia(
    sex: &str,
    age: f64,
    race: &str,
    weight_kg: f64,
    height_cm: f64,
    hand_grip_kg: f64,
    sit_to_stand_secs: f64,
    gait_speed_ms: f64,
) -> Result<SarcopeniaResponse, String> {
    let input = FunctionalTestInput {
        sex: Some(parse_sex(sex)?),
        age: Some(age),
        race: Some(parse_race(race)?),
        weight_kg: Some(weight_kg),
        height_cm: Some(height_cm),
        hand_grip_kg: Some(hand_grip_kg),
        sit_to_stand_secs: Some(sit_to_stand_secs),
        gait_speed_ms: Some(gait_speed_ms),
    };

    let assessment = calc::try_assess_sarcopenia(&input).map_err(calc_error)?;

    Ok(SarcopeniaResponse {
        ammi: assessment.ammi,
        flags: assessment.flags,
        stage: assessment.stage.as_str().to_string(),
        stage_display: assessment.stage.display_name().to_string(),
    })
}

/// Response for score_sarc_f
#[derive(Debug, Serialize)]
pub struct SarcFResponse {
    pub total: u8,
    pub interpretation: String,
    pub interpretation_display: String,
    pub recommendation: String,
}

pub fn score_sarc_f(responses: SarcFResponses) -> Result<SarcFResponse, String> {
    if let Some(bad) = responses
        .items()
        .iter()
        .flatten()
        .find(|s| **s > calc::sarc_f::MAX_ITEM_SCORE)
    {
        return Err(format!("SARC-F items are scored 0-2 (got {})", bad));
    }

    let score = calc::sarc_f::score(&responses)
        .ok_or_else(|| "All five SARC-F items must be answered".to_string())?;

    Ok(SarcFResponse {
        total: score.total,
        interpretation: score.interpretation.as_str().to_string(),
        interpretation_display: score.interpretation.display_name().to_string(),
        recommendation: score.interpretation.recommendation().to_string(),
    })
}

pub fn summarize_activity(
    light_walking: ActivityBout,
    moderate: ActivityBout,
    vigorous: ActivityBout,
) -> ActivitySummary {
    calc::summarize_activity(&light_walking, &moderate, &vigorous)
}
