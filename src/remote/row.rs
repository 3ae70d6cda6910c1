//! Remote row mapping
//!
//! The remote `sarcopeniaAssessments` table predates this server: its columns
//! are camelCase and its enum columns hold Portuguese labels. These types map
//! a stored assessment onto that shape.

use serde::{Deserialize, Serialize};

use crate::calc::{
    AlcoholStatus, Race, RiskTier, SarcFInterpretation, SarcopeniaStage, Sex, SmokingStatus,
};
use crate::models::{Assessment, AssessmentMedication};

pub fn sex_label(sex: Sex) -> &'static str {
    match sex {
        Sex::Male => "masculino",
        Sex::Female => "feminino",
    }
}

pub fn race_label(race: Race) -> &'static str {
    match race {
        Race::White => "branco",
        Race::Black => "negro",
        Race::Mixed => "pardo",
        Race::Asian => "amarelo",
        Race::Indigenous => "indigena",
    }
}

pub fn smoking_label(status: SmokingStatus) -> &'static str {
    match status {
        SmokingStatus::Never => "nunca",
        SmokingStatus::Current => "fumante",
        SmokingStatus::Former => "ex-fumante",
    }
}

/// The remote column only knows consumption levels, so drinkers without a
/// resolved tier are recorded as occasional.
pub fn alcohol_label(status: AlcoholStatus, tier: Option<RiskTier>) -> &'static str {
    match (status, tier) {
        (AlcoholStatus::Never, _) | (_, Some(RiskTier::Never)) => "nunca",
        (_, Some(RiskTier::Harmful)) => "excessivo",
        (_, Some(RiskTier::Moderate)) | (_, None) => "ocasional",
    }
}

pub fn stage_label(stage: SarcopeniaStage) -> &'static str {
    match stage {
        SarcopeniaStage::NoSarcopenia => "sem sarcopenia",
        SarcopeniaStage::PreSarcopenic => "pré-sarcopênica",
        SarcopeniaStage::Sarcopenic => "sarcopênica",
        SarcopeniaStage::SevereSarcopenic => "sarcopenia grave",
    }
}

pub fn sarc_f_label(interpretation: SarcFInterpretation) -> &'static str {
    match interpretation {
        SarcFInterpretation::NoSigns => "Sem sinais",
        SarcFInterpretation::SuggestiveOfSarcopenia => "Sugestivo sarcopenia",
    }
}

/// One row of the remote `sarcopeniaAssessments` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAssessmentRow {
    pub age: Option<f64>,
    pub sex: Option<String>,
    pub race: Option<String>,

    pub physical_activity: bool,
    pub light_walking_performs: bool,
    pub light_walking_frequency: f64,
    pub light_walking_duration: f64,
    pub moderate_activity_performs: bool,
    pub moderate_activity_frequency: f64,
    pub moderate_activity_duration: f64,
    pub vigorous_activity_performs: bool,
    pub vigorous_activity_frequency: f64,
    pub vigorous_activity_duration: f64,
    pub sitting_time_weekdays: Option<f64>,
    pub sitting_time_weekends: Option<f64>,

    pub smoking_status: String,
    pub start_smoking_age: Option<f64>,
    pub cigarettes_per_day: Option<f64>,
    pub quitting_age: Option<f64>,
    pub packs_per_year: Option<f64>,
    pub alcohol_consumption: String,

    pub chronic_diseases: Vec<String>,
    pub other_chronic_diseases: Option<String>,

    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub bmi: Option<f64>,
    pub waist_circumference: Option<f64>,
    pub hip_circumference: Option<f64>,
    pub waist_hip_ratio: Option<f64>,
    pub calf_circumference: Option<f64>,

    pub skeletal_muscle: Option<f64>,
    pub fat_mass: Option<f64>,
    pub visceral_fat: Option<f64>,
    pub body_age: Option<f64>,
    pub daily_kcal: Option<f64>,

    pub hand_grip_test: Option<f64>,
    pub sit_to_stand_test: Option<f64>,
    pub walking_speed_test: Option<f64>,
    pub sarcopenia_status: Option<String>,

    pub sarc_f_forca: Option<u8>,
    pub sarc_f_ajuda_caminhar: Option<u8>,
    pub sarc_f_levantar_cadeira: Option<u8>,
    pub sarc_f_subir_escada: Option<u8>,
    pub sarc_f_quedas: Option<u8>,
    pub sarc_f_total: Option<u8>,
    pub sarc_f_result: Option<String>,
}

impl RemoteAssessmentRow {
    /// Columns the remote table declares NOT NULL that this form leaves empty
    pub fn missing_required(assessment: &Assessment) -> Vec<&'static str> {
        let form = &assessment.form;
        let mut missing = Vec::new();
        if form.age.is_none() {
            missing.push("age");
        }
        if form.sex.is_none() {
            missing.push("sex");
        }
        if form.race.is_none() {
            missing.push("race");
        }
        missing
    }

    pub fn from_assessment(assessment: &Assessment) -> Self {
        let form = &assessment.form;
        let derived = assessment.derived();

        Self {
            age: form.age,
            sex: form.sex.map(|s| sex_label(s).to_string()),
            race: form.race.map(|r| race_label(r).to_string()),

            physical_activity: form.physical_activity,
            light_walking_performs: form.light_walking.performs,
            light_walking_frequency: form.light_walking.frequency,
            light_walking_duration: form.light_walking.duration,
            moderate_activity_performs: form.moderate_activity.performs,
            moderate_activity_frequency: form.moderate_activity.frequency,
            moderate_activity_duration: form.moderate_activity.duration,
            vigorous_activity_performs: form.vigorous_activity.performs,
            vigorous_activity_frequency: form.vigorous_activity.frequency,
            vigorous_activity_duration: form.vigorous_activity.duration,
            sitting_time_weekdays: form.sitting_time_weekdays,
            sitting_time_weekends: form.sitting_time_weekends,

            smoking_status: smoking_label(form.smoking.status).to_string(),
            start_smoking_age: form.smoking.start_age,
            cigarettes_per_day: form.smoking.cigarettes_per_day,
            quitting_age: form.smoking.quit_age,
            packs_per_year: derived.pack_years,
            alcohol_consumption: alcohol_label(form.alcohol.status, derived.alcohol_risk)
                .to_string(),

            chronic_diseases: form.chronic_diseases.clone(),
            other_chronic_diseases: form.other_chronic_diseases.clone(),

            weight: form.weight,
            height: form.height,
            bmi: derived.bmi,
            waist_circumference: form.waist_circumference,
            hip_circumference: form.hip_circumference,
            waist_hip_ratio: derived.waist_hip_ratio,
            calf_circumference: form.calf_circumference,

            skeletal_muscle: form.skeletal_muscle,
            fat_mass: form.fat_mass,
            visceral_fat: form.visceral_fat,
            body_age: form.body_age,
            daily_kcal: form.daily_kcal,

            hand_grip_test: form.hand_grip_strength,
            sit_to_stand_test: form.sit_to_stand_time,
            walking_speed_test: form.gait_speed,
            sarcopenia_status: derived
                .sarcopenia
                .as_ref()
                .map(|s| stage_label(s.stage).to_string()),

            sarc_f_forca: form.sarc_f.strength,
            sarc_f_ajuda_caminhar: form.sarc_f.walking_assistance,
            sarc_f_levantar_cadeira: form.sarc_f.chair_rising,
            sarc_f_subir_escada: form.sarc_f.stair_climbing,
            sarc_f_quedas: form.sarc_f.falls,
            sarc_f_total: derived.sarc_f.map(|s| s.total),
            sarc_f_result: derived
                .sarc_f
                .map(|s| sarc_f_label(s.interpretation).to_string()),
        }
    }
}

/// One row of the remote `medications` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteMedicationRow {
    pub assessment_id: String,
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
}

impl RemoteMedicationRow {
    pub fn from_medication(remote_assessment_id: &str, med: &AssessmentMedication) -> Self {
        Self {
            assessment_id: remote_assessment_id.to_string(),
            name: med.name.clone(),
            dosage: med.dosage.clone(),
            frequency: med.frequency.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::test_support::sample_form;

    fn saved_sample() -> Assessment {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| Assessment::create(conn, &sample_form()))
            .unwrap()
    }

    #[test]
    fn test_row_uses_remote_column_names() {
        let row = RemoteAssessmentRow::from_assessment(&saved_sample());
        let json = serde_json::to_value(&row).unwrap();

        for key in [
            "sarcFForca",
            "sarcFAjudaCaminhar",
            "sarcFLevantarCadeira",
            "sarcFSubirEscada",
            "sarcFQuedas",
            "sarcFTotal",
            "sarcFResult",
            "waistHipRatio",
            "packsPerYear",
            "handGripTest",
            "walkingSpeedTest",
            "lightWalkingFrequency",
        ] {
            assert!(json.get(key).is_some(), "missing column {}", key);
        }
    }

    #[test]
    fn test_row_values_are_translated() {
        let row = RemoteAssessmentRow::from_assessment(&saved_sample());

        assert_eq!(row.sex.as_deref(), Some("feminino"));
        assert_eq!(row.race.as_deref(), Some("branco"));
        assert_eq!(row.smoking_status, "ex-fumante");
        assert_eq!(row.alcohol_consumption, "ocasional");
        assert_eq!(row.sarcopenia_status.as_deref(), Some("sarcopenia grave"));
        assert_eq!(row.sarc_f_total, Some(6));
        assert_eq!(row.sarc_f_result.as_deref(), Some("Sugestivo sarcopenia"));
        assert_eq!(row.packs_per_year, Some(10.0));
        assert_eq!(row.bmi, Some(16.02));
    }

    #[test]
    fn test_missing_required_columns() {
        assert!(RemoteAssessmentRow::missing_required(&saved_sample()).is_empty());

        let mut assessment = saved_sample();
        assessment.form.sex = None;
        assessment.form.race = None;
        assert_eq!(
            RemoteAssessmentRow::missing_required(&assessment),
            vec!["sex", "race"]
        );
    }

    #[test]
    fn test_alcohol_label() {
        assert_eq!(alcohol_label(AlcoholStatus::Never, Some(RiskTier::Never)), "nunca");
        assert_eq!(
            alcohol_label(AlcoholStatus::CurrentDrinker, Some(RiskTier::Harmful)),
            "excessivo"
        );
        assert_eq!(alcohol_label(AlcoholStatus::FormerDrinker, None), "ocasional");
    }

    #[test]
    fn test_medication_row() {
        let med = AssessmentMedication {
            id: 1,
            assessment_id: 7,
            name: "Metformin".to_string(),
            dosage: None,
            frequency: Some("twice daily".to_string()),
            created_at: "2026-01-01 00:00:00".to_string(),
        };
        let row = RemoteMedicationRow::from_medication("abc-123", &med);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["assessmentId"], "abc-123");
        assert_eq!(json["name"], "Metformin");
    }
}
