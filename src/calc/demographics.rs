//! Respondent demographics used by several calculators

use serde::{Deserialize, Serialize};

/// Biological sex as recorded on the intake form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "masculino" => Some(Sex::Male),
            "female" | "f" | "feminino" => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

/// Self-declared race, using the categories of the regression equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Race {
    White,
    Black,
    Mixed,
    Asian,
    Indigenous,
}

impl Race {
    pub fn as_str(&self) -> &'static str {
        match self {
            Race::White => "white",
            Race::Black => "black",
            Race::Mixed => "mixed",
            Race::Asian => "asian",
            Race::Indigenous => "indigenous",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "white" | "branco" => Some(Race::White),
            "black" | "negro" => Some(Race::Black),
            "mixed" | "pardo" => Some(Race::Mixed),
            "asian" | "amarelo" => Some(Race::Asian),
            "indigenous" | "indigena" | "indígena" => Some(Race::Indigenous),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Race::White => "White",
            Race::Black => "Black",
            Race::Mixed => "Mixed",
            Race::Asian => "Asian",
            Race::Indigenous => "Indigenous",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_from_str_accepts_form_labels() {
        assert_eq!(Sex::from_str("Male"), Some(Sex::Male));
        assert_eq!(Sex::from_str("feminino"), Some(Sex::Female));
        assert_eq!(Sex::from_str("other"), None);
    }

    #[test]
    fn test_race_from_str_accepts_form_labels() {
        assert_eq!(Race::from_str("pardo"), Some(Race::Mixed));
        assert_eq!(Race::from_str("amarelo"), Some(Race::Asian));
        assert_eq!(Race::from_str("Indigenous"), Some(Race::Indigenous));
        assert_eq!(Race::from_str(""), None);
    }
}
