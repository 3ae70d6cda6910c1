//! SARC-F questionnaire scoring
//!
//! Five self-reported items (Strength, Assistance walking, Rise from chair,
//! Climb stairs, Falls), each scored 0–2, summed to a 0–10 total.

use serde::{Deserialize, Serialize};

/// Highest score a single item can take
pub const MAX_ITEM_SCORE: u8 = 2;

/// Totals at or above this suggest sarcopenia
pub const SUGGESTIVE_THRESHOLD: u8 = 6;

/// SARC-F interpretation of a total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SarcFInterpretation {
    NoSigns,
    SuggestiveOfSarcopenia,
}

impl SarcFInterpretation {
    pub fn as_str(&self) -> &'static str {
        match self {
            SarcFInterpretation::NoSigns => "no_signs",
            SarcFInterpretation::SuggestiveOfSarcopenia => "suggestive_of_sarcopenia",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(' ', "_").replace('-', "_").as_str() {
            "no_signs" | "sem_sinais" => Some(SarcFInterpretation::NoSigns),
            "suggestive_of_sarcopenia" | "suggestive" | "sugestivo_sarcopenia" => {
                Some(SarcFInterpretation::SuggestiveOfSarcopenia)
            }
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SarcFInterpretation::NoSigns => "No signs suggestive of sarcopenia",
            SarcFInterpretation::SuggestiveOfSarcopenia => "Suggestive of sarcopenia",
        }
    }

    /// Follow-up advice shown next to the score
    pub fn recommendation(&self) -> &'static str {
        match self {
            SarcFInterpretation::NoSigns => "Consider periodic re-screening",
            SarcFInterpretation::SuggestiveOfSarcopenia => {
                "Proceed with full investigation and diagnosis"
            }
        }
    }
}

/// The five questionnaire items; None until answered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SarcFResponses {
    pub strength: Option<u8>,
    pub walking_assistance: Option<u8>,
    pub chair_rising: Option<u8>,
    pub stair_climbing: Option<u8>,
    pub falls: Option<u8>,
}

impl SarcFResponses {
    pub fn new(
        strength: u8,
        walking_assistance: u8,
        chair_rising: u8,
        stair_climbing: u8,
        falls: u8,
    ) -> Self {
        Self {
            strength: Some(strength),
            walking_assistance: Some(walking_assistance),
            chair_rising: Some(chair_rising),
            stair_climbing: Some(stair_climbing),
            falls: Some(falls),
        }
    }

    pub fn items(&self) -> [Option<u8>; 5] {
        [
            self.strength,
            self.walking_assistance,
            self.chair_rising,
            self.stair_climbing,
            self.falls,
        ]
    }
}

/// Total with its interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SarcFScore {
    pub total: u8,
    pub interpretation: SarcFInterpretation,
}

/// Sum of the five items, or None unless all are answered with 0–2
pub fn compute_total(responses: &SarcFResponses) -> Option<u8> {
    responses
        .items()
        .iter()
        .try_fold(0u8, |sum, item| match item {
            Some(score) if *score <= MAX_ITEM_SCORE => Some(sum + score),
            _ => None,
        })
}

/// 0–5 shows no signs; 6–10 is suggestive of sarcopenia
pub fn interpret(total: u8) -> SarcFInterpretation {
    if total >= SUGGESTIVE_THRESHOLD {
        SarcFInterpretation::SuggestiveOfSarcopenia
    } else {
        SarcFInterpretation::NoSigns
    }
}

/// Total and interpretation together
pub fn score(responses: &SarcFResponses) -> Option<SarcFScore> {
    compute_total(responses).map(|total| SarcFScore {
        total,
        interpretation: interpret(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestive_total() {
        let responses = SarcFResponses::new(1, 1, 1, 2, 1);
        assert_eq!(compute_total(&responses), Some(6));
        assert_eq!(
            score(&responses),
            Some(SarcFScore {
                total: 6,
                interpretation: SarcFInterpretation::SuggestiveOfSarcopenia
            })
        );
    }

    #[test]
    fn test_zero_total() {
        let responses = SarcFResponses::new(0, 0, 0, 0, 0);
        assert_eq!(compute_total(&responses), Some(0));
        assert_eq!(interpret(0), SarcFInterpretation::NoSigns);
    }

    #[test]
    fn test_interpret_boundaries() {
        assert_eq!(interpret(5), SarcFInterpretation::NoSigns);
        assert_eq!(interpret(6), SarcFInterpretation::SuggestiveOfSarcopenia);
        assert_eq!(interpret(10), SarcFInterpretation::SuggestiveOfSarcopenia);
    }

    #[test]
    fn test_missing_or_out_of_range_item() {
        let mut responses = SarcFResponses::new(2, 2, 2, 2, 2);
        assert_eq!(compute_total(&responses), Some(10));

        responses.falls = None;
        assert_eq!(compute_total(&responses), None);
        assert_eq!(score(&responses), None);

        responses.falls = Some(3);
        assert_eq!(compute_total(&responses), None);
    }
}
