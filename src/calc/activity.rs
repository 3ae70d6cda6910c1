//! Physical activity summary (IPAQ short form)
//!
//! Weekly minutes per activity bout and MET-minutes/week, using the IPAQ
//! scoring weights for walking, moderate and vigorous activity.

use serde::{Deserialize, Serialize};

use super::units::round2;

/// MET weight for walking
pub const WALKING_MET: f64 = 3.3;
/// MET weight for moderate activity
pub const MODERATE_MET: f64 = 4.0;
/// MET weight for vigorous activity
pub const VIGOROUS_MET: f64 = 8.0;

/// One activity question: does the respondent do it, how many days, how long
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityBout {
    pub performs: bool,
    /// Days per week, 0–7
    pub frequency: f64,
    /// Minutes per day
    pub duration: f64,
}

impl ActivityBout {
    pub fn new(frequency: f64, duration: f64) -> Self {
        Self {
            performs: true,
            frequency,
            duration,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub walking_minutes: f64,
    pub moderate_minutes: f64,
    pub vigorous_minutes: f64,
    pub total_minutes: f64,
    pub met_minutes: f64,
}

/// Minutes per week for a bout; zero when the activity isn't performed
pub fn weekly_minutes(bout: &ActivityBout) -> f64 {
    if !bout.performs || !bout.frequency.is_finite() || !bout.duration.is_finite() {
        return 0.0;
    }
    bout.frequency.clamp(0.0, 7.0) * bout.duration.max(0.0)
}

pub fn summarize_activity(
    light_walking: &ActivityBout,
    moderate: &ActivityBout,
    vigorous: &ActivityBout,
) -> ActivitySummary {
    let walking_minutes = weekly_minutes(light_walking);
    let moderate_minutes = weekly_minutes(moderate);
    let vigorous_minutes = weekly_minutes(vigorous);

    let met_minutes = WALKING_MET * walking_minutes
        + MODERATE_MET * moderate_minutes
        + VIGOROUS_MET * vigorous_minutes;

    ActivitySummary {
        walking_minutes,
        moderate_minutes,
        vigorous_minutes,
        total_minutes: walking_minutes + moderate_minutes + vigorous_minutes,
        met_minutes: round2(met_minutes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_minutes() {
        assert_eq!(weekly_minutes(&ActivityBout::new(3.0, 30.0)), 90.0);
        assert_eq!(weekly_minutes(&ActivityBout::default()), 0.0);

        let skipped = ActivityBout {
            performs: false,
            frequency: 5.0,
            duration: 60.0,
        };
        assert_eq!(weekly_minutes(&skipped), 0.0);
    }

    #[test]
    fn test_summarize_activity() {
        let summary = summarize_activity(
            &ActivityBout::new(5.0, 30.0),
            &ActivityBout::new(2.0, 45.0),
            &ActivityBout::default(),
        );
        assert_eq!(summary.walking_minutes, 150.0);
        assert_eq!(summary.moderate_minutes, 90.0);
        assert_eq!(summary.vigorous_minutes, 0.0);
        assert_eq!(summary.total_minutes, 240.0);
        // 3.3·150 + 4·90
        assert_eq!(summary.met_minutes, 855.0);
    }
}
