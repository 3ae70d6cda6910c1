//! Shared fixtures for model and tool tests

use crate::calc::{
    ActivityBout, AlcoholStatus, Race, SarcFResponses, Sex, SmokingStatus,
};

use super::{AssessmentCreate, MedicationEntry};

/// A complete form for an 80-year-old woman who screens as severely sarcopenic
pub fn sample_form() -> AssessmentCreate {
    let mut form = AssessmentCreate {
        age: Some(80.0),
        sex: Some(Sex::Female),
        race: Some(Race::White),
        physical_activity: true,
        light_walking: ActivityBout::new(3.0, 20.0),
        chronic_diseases: vec!["hypertension".to_string()],
        medications: vec![MedicationEntry {
            name: "Losartan".to_string(),
            dosage: Some("50mg".to_string()),
            frequency: Some("daily".to_string()),
        }],
        weight: Some(41.0),
        height: Some(160.0),
        waist_circumference: Some(85.5),
        hip_circumference: Some(95.0),
        hand_grip_strength: Some(14.0),
        sit_to_stand_time: Some(18.0),
        gait_speed: Some(0.6),
        sarc_f: SarcFResponses::new(1, 1, 1, 2, 1),
        ..Default::default()
    };
    form.smoking.status = SmokingStatus::Former;
    form.smoking.start_age = Some(20.0);
    form.smoking.quit_age = Some(40.0);
    form.smoking.cigarettes_per_day = Some(10.0);
    form.alcohol.status = AlcoholStatus::CurrentDrinker;
    form.alcohol.current_frequency = Some(2.0);
    form.alcohol.current_doses = Some(3.0);
    form
}

/// A form with demographics only
pub fn minimal_form(age: f64, sex: Sex, race: Race) -> AssessmentCreate {
    AssessmentCreate {
        age: Some(age),
        sex: Some(sex),
        race: Some(race),
        ..Default::default()
    }
}
