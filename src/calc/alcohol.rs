//! Alcohol consumption: weekly standard drinks and sex-adjusted risk tier

use serde::{Deserialize, Serialize};

use super::demographics::Sex;

/// Standard-drink conversion factor applied to doses per occasion
pub const STANDARD_DRINK_FACTOR: f64 = 14.0;

/// Days per week
pub const DAYS_PER_WEEK: f64 = 7.0;

/// Weekly standard drinks above which consumption is harmful (female)
pub const FEMALE_HARMFUL_LIMIT: f64 = 20.0;

/// Weekly standard drinks above which consumption is harmful (male)
pub const MALE_HARMFUL_LIMIT: f64 = 40.0;

/// Drinking status as recorded on the intake form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlcoholStatus {
    Never,
    FormerDrinker,
    CurrentDrinker,
}

impl AlcoholStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlcoholStatus::Never => "never",
            AlcoholStatus::FormerDrinker => "former_drinker",
            AlcoholStatus::CurrentDrinker => "current_drinker",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "never" | "nunca" => Some(AlcoholStatus::Never),
            "former" | "former_drinker" | "ex_bebedor" => Some(AlcoholStatus::FormerDrinker),
            "current" | "current_drinker" | "bebe" => Some(AlcoholStatus::CurrentDrinker),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AlcoholStatus::Never => "Never drank",
            AlcoholStatus::FormerDrinker => "Former drinker",
            AlcoholStatus::CurrentDrinker => "Current drinker",
        }
    }
}

/// Alcohol consumption risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Never,
    Moderate,
    Harmful,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Never => "never",
            RiskTier::Moderate => "moderate",
            RiskTier::Harmful => "harmful",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "never" => Some(RiskTier::Never),
            "moderate" => Some(RiskTier::Moderate),
            "harmful" => Some(RiskTier::Harmful),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RiskTier::Never => "Never",
            RiskTier::Moderate => "Moderate",
            RiskTier::Harmful => "Harmful",
        }
    }
}

/// Alcohol section of the intake form.
///
/// Current and former drinking patterns are recorded separately; only the one
/// matching `status` feeds the risk tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlcoholProfile {
    pub status: AlcoholStatus,
    pub current_frequency: Option<f64>,
    pub current_doses: Option<f64>,
    pub former_frequency: Option<f64>,
    pub former_doses: Option<f64>,
    pub start_age: Option<f64>,
    pub quit_age: Option<f64>,
}

impl Default for AlcoholProfile {
    fn default() -> Self {
        Self::cleared(AlcoholStatus::Never)
    }
}

impl AlcoholProfile {
    /// A profile with the given status and every sub-field unset
    pub fn cleared(status: AlcoholStatus) -> Self {
        Self {
            status,
            current_frequency: None,
            current_doses: None,
            former_frequency: None,
            former_doses: None,
            start_age: None,
            quit_age: None,
        }
    }
}

/// Outcome of resolving an alcohol profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlcoholResolution {
    /// Unset until the sub-fields required by the status are supplied
    pub risk_tier: Option<RiskTier>,
    pub weekly_standard_drinks: Option<f64>,
    /// The profile to write back; all sub-fields cleared when status is Never
    pub profile: AlcoholProfile,
}

/// frequency × doses × 14 / 7.
///
/// Frequency is occasions per week and is clamped to [0, 7].
pub fn compute_weekly_standard_drinks(frequency_per_week: f64, doses_per_occasion: f64) -> f64 {
    let frequency = frequency_per_week.clamp(0.0, DAYS_PER_WEEK);
    frequency * doses_per_occasion * STANDARD_DRINK_FACTOR / DAYS_PER_WEEK
}

/// Harmful when weekly standard drinks exceed the sex-specific limit
pub fn classify_alcohol_risk(weekly_standard_drinks: f64, sex: Sex) -> RiskTier {
    let limit = match sex {
        Sex::Female => FEMALE_HARMFUL_LIMIT,
        Sex::Male => MALE_HARMFUL_LIMIT,
    };
    if weekly_standard_drinks > limit {
        RiskTier::Harmful
    } else {
        RiskTier::Moderate
    }
}

/// Resolve the risk tier for a profile.
///
/// Never clears every sub-field. Drinkers are classified from the pattern that
/// matches their status (current or former); the tier stays unset until both
/// frequency and doses for that pattern, and the respondent's sex, are known.
pub fn resolve_alcohol_profile(profile: &AlcoholProfile, sex: Option<Sex>) -> AlcoholResolution {
    let (frequency, doses) = match profile.status {
        AlcoholStatus::Never => {
            return AlcoholResolution {
                risk_tier: Some(RiskTier::Never),
                weekly_standard_drinks: None,
                profile: AlcoholProfile::cleared(AlcoholStatus::Never),
            };
        }
        AlcoholStatus::CurrentDrinker => (profile.current_frequency, profile.current_doses),
        AlcoholStatus::FormerDrinker => (profile.former_frequency, profile.former_doses),
    };

    let weekly = match (frequency, doses) {
        (Some(f), Some(d)) if f.is_finite() && d.is_finite() && d >= 0.0 => {
            Some(compute_weekly_standard_drinks(f, d))
        }
        _ => None,
    };

    AlcoholResolution {
        risk_tier: weekly.zip(sex).map(|(w, s)| classify_alcohol_risk(w, s)),
        weekly_standard_drinks: weekly,
        profile: profile.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drinker(status: AlcoholStatus) -> AlcoholProfile {
        AlcoholProfile {
            status,
            current_frequency: Some(2.0),
            current_doses: Some(3.0),
            former_frequency: Some(7.0),
            former_doses: Some(2.0),
            start_age: Some(18.0),
            quit_age: Some(50.0),
        }
    }

    #[test]
    fn test_weekly_standard_drinks() {
        assert_eq!(compute_weekly_standard_drinks(2.0, 3.0), 12.0);
        assert_eq!(compute_weekly_standard_drinks(0.0, 5.0), 0.0);
        assert_eq!(compute_weekly_standard_drinks(7.0, 1.0), 14.0);
        // Frequency beyond a full week is capped
        assert_eq!(compute_weekly_standard_drinks(9.0, 1.0), 14.0);
    }

    #[test]
    fn test_classify_alcohol_risk() {
        assert_eq!(classify_alcohol_risk(12.0, Sex::Female), RiskTier::Moderate);
        assert_eq!(classify_alcohol_risk(20.0, Sex::Female), RiskTier::Moderate);
        assert_eq!(classify_alcohol_risk(25.0, Sex::Female), RiskTier::Harmful);
        assert_eq!(classify_alcohol_risk(25.0, Sex::Male), RiskTier::Moderate);
        assert_eq!(classify_alcohol_risk(40.5, Sex::Male), RiskTier::Harmful);
    }

    #[test]
    fn test_never_clears_sub_fields() {
        let resolution = resolve_alcohol_profile(&drinker(AlcoholStatus::Never), Some(Sex::Male));
        assert_eq!(resolution.risk_tier, Some(RiskTier::Never));
        assert_eq!(resolution.weekly_standard_drinks, None);
        assert_eq!(resolution.profile, AlcoholProfile::cleared(AlcoholStatus::Never));
    }

    #[test]
    fn test_current_drinker_uses_current_fields() {
        let resolution =
            resolve_alcohol_profile(&drinker(AlcoholStatus::CurrentDrinker), Some(Sex::Female));
        assert_eq!(resolution.weekly_standard_drinks, Some(12.0));
        assert_eq!(resolution.risk_tier, Some(RiskTier::Moderate));
        assert_eq!(resolution.profile.current_doses, Some(3.0));
    }

    #[test]
    fn test_former_drinker_uses_former_fields() {
        let resolution =
            resolve_alcohol_profile(&drinker(AlcoholStatus::FormerDrinker), Some(Sex::Female));
        assert_eq!(resolution.weekly_standard_drinks, Some(28.0));
        assert_eq!(resolution.risk_tier, Some(RiskTier::Harmful));
    }

    #[test]
    fn test_tier_unset_until_fields_supplied() {
        let mut profile = AlcoholProfile::cleared(AlcoholStatus::CurrentDrinker);
        profile.current_frequency = Some(3.0);
        let resolution = resolve_alcohol_profile(&profile, Some(Sex::Male));
        assert_eq!(resolution.risk_tier, None);
        assert_eq!(resolution.weekly_standard_drinks, None);

        profile.current_doses = Some(2.0);
        let resolution = resolve_alcohol_profile(&profile, None);
        assert_eq!(resolution.weekly_standard_drinks, Some(12.0));
        assert_eq!(resolution.risk_tier, None);
    }
}
