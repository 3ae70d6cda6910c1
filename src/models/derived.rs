//! Derived metrics model
//!
//! Runs every calculator over an intake form. The result is a pure function of
//! the form: recomputing with an unchanged form always gives the same record.

use serde::{Deserialize, Serialize};

use crate::calc::{
    self, ActivitySummary, BmiStatus, RiskTier, SarcFScore, SarcopeniaAssessment,
};

use super::AssessmentCreate;

/// All values the intake form displays as "calculated"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub bmi: Option<f64>,
    pub bmi_status: Option<BmiStatus>,
    pub waist_hip_ratio: Option<f64>,
    pub pack_years: Option<f64>,
    pub weekly_standard_drinks: Option<f64>,
    pub alcohol_risk: Option<RiskTier>,
    pub sarcopenia: Option<SarcopeniaAssessment>,
    pub sarc_f: Option<SarcFScore>,
    pub activity: ActivitySummary,
}

impl DerivedMetrics {
    pub fn compute(form: &AssessmentCreate) -> Self {
        let body = calc::compute_body_metrics(
            form.weight,
            form.height,
            form.waist_circumference,
            form.hip_circumference,
        );
        let alcohol = calc::resolve_alcohol_profile(&form.alcohol, form.sex);

        Self {
            bmi: body.bmi,
            bmi_status: body.bmi_status,
            waist_hip_ratio: body.waist_hip_ratio,
            pack_years: calc::resolve_pack_years(&form.smoking, form.age),
            weekly_standard_drinks: alcohol.weekly_standard_drinks,
            alcohol_risk: alcohol.risk_tier,
            sarcopenia: calc::assess_sarcopenia(&form.functional_test_input()),
            sarc_f: calc::sarc_f::score(&form.sarc_f),
            activity: calc::summarize_activity(
                &form.light_walking,
                &form.moderate_activity,
                &form.vigorous_activity,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{SarcFInterpretation, SarcopeniaStage};
    use crate::models::test_support::sample_form;

    #[test]
    fn test_compute_full_form() {
        let derived = DerivedMetrics::compute(&sample_form());

        assert_eq!(derived.bmi, Some(16.02));
        assert_eq!(derived.bmi_status, Some(BmiStatus::Underweight));
        assert_eq!(derived.waist_hip_ratio, Some(0.9));
        assert_eq!(derived.pack_years, Some(10.0));
        assert_eq!(derived.weekly_standard_drinks, Some(12.0));
        assert_eq!(derived.alcohol_risk, Some(RiskTier::Moderate));
        assert_eq!(
            derived.sarcopenia.as_ref().map(|s| s.stage),
            Some(SarcopeniaStage::SevereSarcopenic)
        );
        assert_eq!(
            derived.sarc_f.map(|s| s.interpretation),
            Some(SarcFInterpretation::SuggestiveOfSarcopenia)
        );
        assert_eq!(derived.activity.walking_minutes, 60.0);
    }

    #[test]
    fn test_compute_empty_form_leaves_values_unset() {
        let derived = DerivedMetrics::compute(&AssessmentCreate::default());
        assert_eq!(derived.bmi, None);
        assert_eq!(derived.pack_years, None);
        assert_eq!(derived.alcohol_risk, Some(RiskTier::Never));
        assert_eq!(derived.sarcopenia, None);
        assert_eq!(derived.sarc_f, None);
        assert_eq!(derived.activity.total_minutes, 0.0);
    }

    #[test]
    fn test_compute_is_deterministic() {
        let form = sample_form();
        assert_eq!(DerivedMetrics::compute(&form), DerivedMetrics::compute(&form));
    }
}
