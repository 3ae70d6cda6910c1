//! Derived-metric calculation engine
//!
//! Pure, stateless calculators that turn raw intake form fields into clinical
//! indices and classifications. Nothing here touches the database or the
//! network; every function's output depends only on its arguments.

pub mod activity;
pub mod alcohol;
pub mod body;
pub mod demographics;
pub mod sarc_f;
pub mod sarcopenia;
pub mod smoking;
pub mod units;

use thiserror::Error;

pub use activity::{summarize_activity, weekly_minutes, ActivityBout, ActivitySummary};
pub use alcohol::{
    classify_alcohol_risk, compute_weekly_standard_drinks, resolve_alcohol_profile,
    AlcoholProfile, AlcoholResolution, AlcoholStatus, RiskTier,
};
pub use body::{
    classify_bmi, compute_bmi, compute_body_metrics, compute_waist_hip_ratio, BmiResult,
    BmiStatus, BodyMetrics,
};
pub use demographics::{Race, Sex};
pub use sarc_f::{compute_total, interpret, SarcFInterpretation, SarcFResponses, SarcFScore};
pub use sarcopenia::{
    assess_flags, assess_sarcopenia, classify_stage, compute_ammi, try_assess_sarcopenia,
    FunctionalTestInput, SarcopeniaAssessment, SarcopeniaFlags, SarcopeniaStage,
};
pub use smoking::{
    compute_pack_years, resolve_pack_years, years_smoked, SmokingProfile, SmokingStatus,
};
pub use units::{cm_to_m, round2};

/// Reasons a derived value cannot be computed yet
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("invalid value for {field}: {value}")]
    InvalidInput { field: &'static str, value: f64 },

    #[error("missing required input: {0}")]
    IncompleteInputSet(&'static str),
}

/// Result type for calculators that report why they could not compute
pub type CalcResult<T> = Result<T, CalcError>;
