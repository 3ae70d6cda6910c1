//! Intake form model
//!
//! The normalized content of one filled-in sarcopenia intake form. Every
//! measurement is optional because the form is saved as the respondent fills
//! it; calculators decide for themselves what they need.

use serde::{Deserialize, Serialize};

use crate::calc::{
    ActivityBout, AlcoholProfile, AlcoholStatus, FunctionalTestInput, Race, SarcFResponses, Sex,
    SmokingProfile,
};

use super::MedicationEntry;

/// Data for creating a new assessment (the intake form)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentCreate {
    // Biological and sociodemographic
    pub age: Option<f64>,
    pub sex: Option<Sex>,
    pub race: Option<Race>,

    // Physical activity (IPAQ)
    pub physical_activity: bool,
    pub light_walking: ActivityBout,
    pub moderate_activity: ActivityBout,
    pub vigorous_activity: ActivityBout,
    /// Hours per day
    pub sitting_time_weekdays: Option<f64>,
    /// Hours per day
    pub sitting_time_weekends: Option<f64>,

    // Lifestyle
    pub smoking: SmokingProfile,
    pub alcohol: AlcoholProfile,

    // Health conditions
    pub chronic_diseases: Vec<String>,
    pub other_chronic_diseases: Option<String>,
    pub medications: Vec<MedicationEntry>,

    // Anthropometric (kg, cm)
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub waist_circumference: Option<f64>,
    pub hip_circumference: Option<f64>,
    pub calf_circumference: Option<f64>,

    // Body composition (bioimpedance)
    pub skeletal_muscle: Option<f64>,
    pub fat_mass: Option<f64>,
    pub visceral_fat: Option<f64>,
    pub body_age: Option<f64>,
    pub daily_kcal: Option<f64>,

    // Muscular function
    /// kg
    pub hand_grip_strength: Option<f64>,
    /// seconds
    pub sit_to_stand_time: Option<f64>,
    /// m/s
    pub gait_speed: Option<f64>,

    // SARC-F
    pub sarc_f: SarcFResponses,
}

impl AssessmentCreate {
    /// The subset of fields the sarcopenia classifier reads
    pub fn functional_test_input(&self) -> FunctionalTestInput {
        FunctionalTestInput {
            sex: self.sex,
            age: self.age,
            race: self.race,
            weight_kg: self.weight,
            height_cm: self.height,
            hand_grip_kg: self.hand_grip_strength,
            sit_to_stand_secs: self.sit_to_stand_time,
            gait_speed_ms: self.gait_speed,
        }
    }

    /// Apply the form's own reset rules before saving.
    ///
    /// A respondent who never drank has every alcohol sub-field cleared, and
    /// blank medication names are dropped.
    pub fn normalized(mut self) -> Self {
        if self.alcohol.status == AlcoholStatus::Never {
            self.alcohol = AlcoholProfile::cleared(AlcoholStatus::Never);
        }
        self.medications.retain(|m| !m.name.trim().is_empty());
        self.chronic_diseases.retain(|d| !d.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_clears_alcohol_for_never() {
        let mut form = AssessmentCreate::default();
        form.alcohol.current_frequency = Some(3.0);
        form.alcohol.start_age = Some(20.0);

        let form = form.normalized();
        assert_eq!(form.alcohol, AlcoholProfile::cleared(AlcoholStatus::Never));
    }

    #[test]
    fn test_normalized_keeps_drinker_fields() {
        let mut form = AssessmentCreate::default();
        form.alcohol.status = AlcoholStatus::CurrentDrinker;
        form.alcohol.current_frequency = Some(3.0);

        let form = form.normalized();
        assert_eq!(form.alcohol.current_frequency, Some(3.0));
    }

    #[test]
    fn test_deserialize_partial_form() {
        let form: AssessmentCreate =
            serde_json::from_str(r#"{"age": 72, "sex": "female", "sarc_f": {"falls": 1}}"#)
                .unwrap();
        assert_eq!(form.age, Some(72.0));
        assert_eq!(form.sex, Some(Sex::Female));
        assert_eq!(form.sarc_f.falls, Some(1));
        assert_eq!(form.sarc_f.strength, None);
        assert!(!form.physical_activity);
    }
}
