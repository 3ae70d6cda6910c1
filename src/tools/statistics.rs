//! Statistics MCP Tools
//!
//! Cohort-level summaries over every stored assessment.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::calc::{round2, SarcFInterpretation};
use crate::db::Database;
use crate::models::Assessment;

const UNKNOWN: &str = "unknown";

/// Aggregated view of all stored assessments
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub total_forms: usize,
    pub age_distribution: BTreeMap<String, usize>,
    pub sex_distribution: BTreeMap<String, usize>,
    pub race_distribution: BTreeMap<String, usize>,
    pub smoking_distribution: BTreeMap<String, usize>,
    pub sarcopenia_distribution: BTreeMap<String, usize>,
    pub sarc_f_distribution: BTreeMap<String, usize>,
    /// Over assessments with a BMI
    pub average_bmi: Option<f64>,
    /// Over assessments with a waist-hip ratio
    pub average_waist_hip_ratio: Option<f64>,
    pub physical_activity_percentage: f64,
}

/// Age band used by the cohort view
pub fn age_bucket(age: f64) -> &'static str {
    if age < 30.0 {
        "18-29"
    } else if age < 40.0 {
        "30-39"
    } else if age < 50.0 {
        "40-49"
    } else if age < 60.0 {
        "50-59"
    } else if age < 70.0 {
        "60-69"
    } else {
        "70+"
    }
}

fn sarc_f_category(total: Option<u8>, interpretation: Option<SarcFInterpretation>) -> &'static str {
    match (total, interpretation) {
        (Some(_), Some(SarcFInterpretation::NoSigns)) => "No signs (0-5)",
        (Some(_), Some(SarcFInterpretation::SuggestiveOfSarcopenia)) => "Suggestive (6-10)",
        _ => "incomplete",
    }
}

fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(round2(values.iter().sum::<f64>() / values.len() as f64))
}

fn bump(map: &mut BTreeMap<String, usize>, key: &str) {
    *map.entry(key.to_string()).or_default() += 1;
}

/// Aggregate statistics from stored assessments (reads cached columns)
pub fn aggregate_statistics(assessments: &[Assessment]) -> Statistics {
    if assessments.is_empty() {
        return Statistics::default();
    }

    let mut stats = Statistics {
        total_forms: assessments.len(),
        ..Statistics::default()
    };

    let mut bmis = Vec::new();
    let mut ratios = Vec::new();
    let mut active = 0usize;

    for a in assessments {
        bump(
            &mut stats.age_distribution,
            a.age.map(age_bucket).unwrap_or(UNKNOWN),
        );
        bump(
            &mut stats.sex_distribution,
            a.sex.map(|s| s.as_str()).unwrap_or(UNKNOWN),
        );
        bump(
            &mut stats.race_distribution,
            a.race.map(|r| r.as_str()).unwrap_or(UNKNOWN),
        );
        bump(&mut stats.smoking_distribution, a.smoking_status.as_str());
        bump(
            &mut stats.sarcopenia_distribution,
            a.cached_sarcopenia_stage
                .map(|s| s.as_str())
                .unwrap_or(UNKNOWN),
        );
        bump(
            &mut stats.sarc_f_distribution,
            sarc_f_category(a.cached_sarc_f_total, a.cached_sarc_f_interpretation),
        );

        bmis.extend(a.cached_bmi);
        ratios.extend(a.cached_waist_hip_ratio);
        if a.physical_activity {
            active += 1;
        }
    }

    stats.average_bmi = average(&bmis);
    stats.average_waist_hip_ratio = average(&ratios);
    stats.physical_activity_percentage =
        round2(active as f64 / assessments.len() as f64 * 100.0);

    stats
}

/// Statistics over every stored assessment
pub fn get_statistics(db: &Database) -> Result<Statistics, String> {
    let assessments = db
        .with_conn(Assessment::list_all)
        .map_err(|e| format!("Failed to load assessments: {}", e))?;
    Ok(aggregate_statistics(&assessments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{Race, Sex, SmokingStatus};
    use crate::models::test_support::{minimal_form, sample_form};

    #[test]
    fn test_age_bucket_edges() {
        assert_eq!(age_bucket(18.0), "18-29");
        assert_eq!(age_bucket(29.9), "18-29");
        assert_eq!(age_bucket(30.0), "30-39");
        assert_eq!(age_bucket(69.0), "60-69");
        assert_eq!(age_bucket(70.0), "70+");
    }

    #[test]
    fn test_empty_statistics() {
        let stats = aggregate_statistics(&[]);
        assert_eq!(stats.total_forms, 0);
        assert_eq!(stats.average_bmi, None);
        assert_eq!(stats.physical_activity_percentage, 0.0);
    }

    #[test]
    fn test_statistics_over_stored_assessments() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            Assessment::create(conn, &sample_form())?;

            let mut second = minimal_form(35.0, Sex::Male, Race::Black);
            second.weight = Some(81.0);
            second.height = Some(180.0);
            second.smoking.status = SmokingStatus::Current;
            Assessment::create(conn, &second)?;

            Assessment::create(conn, &minimal_form(72.0, Sex::Female, Race::Mixed))?;
            Ok(())
        })
        .unwrap();

        let stats = get_statistics(&db).unwrap();

        assert_eq!(stats.total_forms, 3);
        assert_eq!(stats.age_distribution.get("70+"), Some(&2));
        assert_eq!(stats.age_distribution.get("30-39"), Some(&1));
        assert_eq!(stats.sex_distribution.get("female"), Some(&2));
        assert_eq!(stats.race_distribution.get("black"), Some(&1));
        assert_eq!(stats.smoking_distribution.get("former"), Some(&1));
        assert_eq!(stats.smoking_distribution.get("current"), Some(&1));
        assert_eq!(stats.smoking_distribution.get("never"), Some(&1));
        assert_eq!(stats.sarcopenia_distribution.get("severe_sarcopenic"), Some(&1));
        assert_eq!(stats.sarcopenia_distribution.get("unknown"), Some(&2));
        assert_eq!(stats.sarc_f_distribution.get("Suggestive (6-10)"), Some(&1));
        assert_eq!(stats.sarc_f_distribution.get("incomplete"), Some(&2));
        // 16.02 and 25.0
        assert_eq!(stats.average_bmi, Some(20.51));
        assert_eq!(stats.average_waist_hip_ratio, Some(0.9));
        assert_eq!(stats.physical_activity_percentage, 33.33);
    }
}
