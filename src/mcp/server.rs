//! Sarcopenia Intake MCP Server Implementation
//!
//! Implements the MCP server with all intake tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::calc::{ActivityBout, AlcoholProfile, SarcFResponses, SmokingProfile};
use crate::db::Database;
use crate::models::{AssessmentCreate, MedicationEntry};
use crate::remote::RemoteStore;
use crate::tools::calculators::{self, parse_alcohol_status, parse_race, parse_sex, parse_smoking_status};
use crate::tools::status::StatusTracker;
use crate::tools::{assessments, statistics};

/// Sarcopenia Intake MCP Service
#[derive(Clone)]
pub struct SarcService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    remote: Arc<dyn RemoteStore>,
    tool_router: ToolRouter<SarcService>,
}

impl SarcService {
    pub fn new(database_path: PathBuf, database: Database, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            remote,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Form Parameter Structs
// ============================================================================

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ActivityBoutParams {
    /// Whether the respondent does this activity at all
    #[serde(default)]
    pub performs: bool,
    /// Days per week (0-7)
    #[serde(default)]
    pub frequency: f64,
    /// Minutes per day
    #[serde(default)]
    pub duration: f64,
}

impl From<ActivityBoutParams> for ActivityBout {
    fn from(p: ActivityBoutParams) -> Self {
        ActivityBout {
            performs: p.performs,
            frequency: p.frequency,
            duration: p.duration,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SmokingParams {
    /// never, current, former (or nunca, fumante, ex-fumante)
    pub status: String,
    pub start_age: Option<f64>,
    pub cigarettes_per_day: Option<f64>,
    /// Age the respondent quit (former smokers)
    pub quit_age: Option<f64>,
}

impl SmokingParams {
    fn into_profile(self) -> Result<SmokingProfile, String> {
        Ok(SmokingProfile {
            status: parse_smoking_status(&self.status)?,
            start_age: self.start_age,
            cigarettes_per_day: self.cigarettes_per_day,
            quit_age: self.quit_age,
        })
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AlcoholParams {
    /// never, former_drinker, current_drinker
    pub status: String,
    /// Occasions per week (current drinkers)
    pub current_frequency: Option<f64>,
    /// Doses per occasion (current drinkers)
    pub current_doses: Option<f64>,
    /// Occasions per week (former drinkers)
    pub former_frequency: Option<f64>,
    /// Doses per occasion (former drinkers)
    pub former_doses: Option<f64>,
    pub start_age: Option<f64>,
    pub quit_age: Option<f64>,
}

impl AlcoholParams {
    fn into_profile(self) -> Result<AlcoholProfile, String> {
        Ok(AlcoholProfile {
            status: parse_alcohol_status(&self.status)?,
            current_frequency: self.current_frequency,
            current_doses: self.current_doses,
            former_frequency: self.former_frequency,
            former_doses: self.former_doses,
            start_age: self.start_age,
            quit_age: self.quit_age,
        })
    }
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct SarcFParams {
    /// Difficulty lifting/carrying 4.5 kg (0-2)
    pub strength: Option<u8>,
    /// Difficulty walking across a room (0-2)
    pub walking_assistance: Option<u8>,
    /// Difficulty transferring from a chair or bed (0-2)
    pub chair_rising: Option<u8>,
    /// Difficulty climbing 10 stairs (0-2)
    pub stair_climbing: Option<u8>,
    /// Falls in the past year (0 none, 1 one to three, 2 four or more)
    pub falls: Option<u8>,
}

impl From<SarcFParams> for SarcFResponses {
    fn from(p: SarcFParams) -> Self {
        SarcFResponses {
            strength: p.strength,
            walking_assistance: p.walking_assistance,
            chair_rising: p.chair_rising,
            stair_climbing: p.stair_climbing,
            falls: p.falls,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MedicationParams {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
}

/// The whole intake form; every field is optional
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct AssessmentFormParams {
    pub age: Option<f64>,
    /// male or female
    pub sex: Option<String>,
    /// white, black, mixed, asian, indigenous
    pub race: Option<String>,

    #[serde(default)]
    pub physical_activity: bool,
    pub light_walking: Option<ActivityBoutParams>,
    pub moderate_activity: Option<ActivityBoutParams>,
    pub vigorous_activity: Option<ActivityBoutParams>,
    /// Hours per day
    pub sitting_time_weekdays: Option<f64>,
    /// Hours per day
    pub sitting_time_weekends: Option<f64>,

    pub smoking: Option<SmokingParams>,
    pub alcohol: Option<AlcoholParams>,

    #[serde(default)]
    pub chronic_diseases: Vec<String>,
    pub other_chronic_diseases: Option<String>,
    #[serde(default)]
    pub medications: Vec<MedicationParams>,

    /// kg
    pub weight: Option<f64>,
    /// cm
    pub height: Option<f64>,
    pub waist_circumference: Option<f64>,
    pub hip_circumference: Option<f64>,
    pub calf_circumference: Option<f64>,

    pub skeletal_muscle: Option<f64>,
    pub fat_mass: Option<f64>,
    pub visceral_fat: Option<f64>,
    pub body_age: Option<f64>,
    pub daily_kcal: Option<f64>,

    /// kg
    pub hand_grip_strength: Option<f64>,
    /// Seconds for five chair stands
    pub sit_to_stand_time: Option<f64>,
    /// Metres per second
    pub gait_speed: Option<f64>,

    pub sarc_f: Option<SarcFParams>,
}

impl AssessmentFormParams {
    fn into_form(self) -> Result<AssessmentCreate, String> {
        Ok(AssessmentCreate {
            age: self.age,
            sex: self.sex.as_deref().map(parse_sex).transpose()?,
            race: self.race.as_deref().map(parse_race).transpose()?,
            physical_activity: self.physical_activity,
            light_walking: self.light_walking.unwrap_or_default().into(),
            moderate_activity: self.moderate_activity.unwrap_or_default().into(),
            vigorous_activity: self.vigorous_activity.unwrap_or_default().into(),
            sitting_time_weekdays: self.sitting_time_weekdays,
            sitting_time_weekends: self.sitting_time_weekends,
            smoking: self
                .smoking
                .map(SmokingParams::into_profile)
                .transpose()?
                .unwrap_or_default(),
            alcohol: self
                .alcohol
                .map(AlcoholParams::into_profile)
                .transpose()?
                .unwrap_or_default(),
            chronic_diseases: self.chronic_diseases,
            other_chronic_diseases: self.other_chronic_diseases,
            medications: self
                .medications
                .into_iter()
                .map(|m| MedicationEntry {
                    name: m.name,
                    dosage: m.dosage,
                    frequency: m.frequency,
                })
                .collect(),
            weight: self.weight,
            height: self.height,
            waist_circumference: self.waist_circumference,
            hip_circumference: self.hip_circumference,
            calf_circumference: self.calf_circumference,
            skeletal_muscle: self.skeletal_muscle,
            fat_mass: self.fat_mass,
            visceral_fat: self.visceral_fat,
            body_age: self.body_age,
            daily_kcal: self.daily_kcal,
            hand_grip_strength: self.hand_grip_strength,
            sit_to_stand_time: self.sit_to_stand_time,
            gait_speed: self.gait_speed,
            sarc_f: self.sarc_f.unwrap_or_default().into(),
        })
    }
}

// ============================================================================
// Calculator Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BodyMetricsParams {
    /// kg
    pub weight: Option<f64>,
    /// cm
    pub height: Option<f64>,
    /// cm
    pub waist_circumference: Option<f64>,
    /// cm
    pub hip_circumference: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SmokingExposureParams {
    /// never, current, former
    pub status: String,
    /// Respondent's current age
    pub age: Option<f64>,
    pub start_age: Option<f64>,
    pub cigarettes_per_day: Option<f64>,
    pub quit_age: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AlcoholProfileParams {
    /// male or female; needed for the risk tier of drinkers
    pub sex: Option<String>,
    #[serde(flatten)]
    pub alcohol: AlcoholParams,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClassifySarcopeniaParams {
    /// male or female
    pub sex: String,
    pub age: f64,
    /// white, black, mixed, asian, indigenous
    pub race: String,
    /// kg
    pub weight: f64,
    /// cm
    pub height: f64,
    /// kg
    pub hand_grip_strength: f64,
    /// Seconds for five chair stands
    pub sit_to_stand_time: f64,
    /// Metres per second
    pub gait_speed: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SummarizeActivityParams {
    pub light_walking: Option<ActivityBoutParams>,
    pub moderate_activity: Option<ActivityBoutParams>,
    pub vigorous_activity: Option<ActivityBoutParams>,
}

// ============================================================================
// Assessment Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AssessmentIdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListAssessmentsParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RetrySyncParams {
    /// Maximum assessments to push (default 50)
    pub limit: Option<i64>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl SarcService {
    // --- Status ---

    #[tool(description = "Get the current status of the intake server including build info, database status, remote store and process information")]
    async fn sarc_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database, self.remote.name(), self.remote.is_enabled());
        to_json(&status)
    }

    #[tool(description = "Get step-by-step instructions for recording a sarcopenia assessment. Call this before starting an intake session.")]
    fn intake_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::INTAKE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(INTAKE_INSTRUCTIONS)]))
    }

    // --- Calculators ---

    #[tool(description = "Compute BMI, BMI status and waist-hip ratio from weight (kg), height (cm), waist and hip (cm)")]
    fn compute_body_metrics(&self, Parameters(p): Parameters<BodyMetricsParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::compute_body_metrics(p.weight, p.height, p.waist_circumference, p.hip_circumference)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Compute years smoked and pack-years for a smoking history")]
    fn compute_smoking_exposure(&self, Parameters(p): Parameters<SmokingExposureParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::compute_smoking_exposure(&p.status, p.age, p.start_age, p.cigarettes_per_day, p.quit_age)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Resolve an alcohol history to weekly standard drinks and a risk tier (never, moderate, harmful). Status never clears all other alcohol fields.")]
    fn resolve_alcohol_profile(&self, Parameters(p): Parameters<AlcoholProfileParams>) -> Result<CallToolResult, McpError> {
        let profile = p.alcohol.into_profile().map_err(|e| McpError::internal_error(e, None))?;
        let result = calculators::resolve_alcohol_profile(p.sex.as_deref(), profile)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Compute AMMI and classify sarcopenia stage from demographics, anthropometrics and functional tests")]
    fn classify_sarcopenia(&self, Parameters(p): Parameters<ClassifySarcopeniaParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::classify_sarcopenia(
            &p.sex, p.age, &p.race, p.weight, p.height,
            p.hand_grip_strength, p.sit_to_stand_time, p.gait_speed,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Score the SARC-F questionnaire (five items, 0-2 each)")]
    fn score_sarc_f(&self, Parameters(p): Parameters<SarcFParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::score_sarc_f(p.into()).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Summarize IPAQ physical activity into weekly minutes and MET-minutes")]
    fn summarize_activity(&self, Parameters(p): Parameters<SummarizeActivityParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::summarize_activity(
            p.light_walking.unwrap_or_default().into(),
            p.moderate_activity.unwrap_or_default().into(),
            p.vigorous_activity.unwrap_or_default().into(),
        );
        to_json(&result)
    }

    // --- Assessments ---

    #[tool(description = "Compute every calculated value for a (possibly partial) intake form without saving it")]
    fn preview_assessment(&self, Parameters(p): Parameters<AssessmentFormParams>) -> Result<CallToolResult, McpError> {
        let form = p.into_form().map_err(|e| McpError::internal_error(e, None))?;
        to_json(&assessments::preview_assessment(form))
    }

    #[tool(description = "Save a completed intake form. Always saved locally; pushed to the remote store when one is configured. A failed remote push is reported but never loses the assessment.")]
    async fn submit_assessment(&self, Parameters(p): Parameters<AssessmentFormParams>) -> Result<CallToolResult, McpError> {
        let form = p.into_form().map_err(|e| McpError::internal_error(e, None))?;
        let result = assessments::submit_assessment(&self.database, self.remote.as_ref(), form)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a stored assessment with its form, calculated values, medications and remote sync state")]
    fn get_assessment(&self, Parameters(p): Parameters<AssessmentIdParams>) -> Result<CallToolResult, McpError> {
        let result = assessments::get_assessment(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(detail) => serde_json::to_string_pretty(&detail),
            None => Ok(format!(r#"{{"error": "Assessment not found", "id": {}}}"#, p.id)),
        }
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List stored assessments, newest first, with pagination")]
    fn list_assessments(&self, Parameters(p): Parameters<ListAssessmentsParams>) -> Result<CallToolResult, McpError> {
        let result = assessments::list_assessments(&self.database, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a stored assessment and its medications from the local database (the remote copy is not touched)")]
    fn delete_assessment(&self, Parameters(p): Parameters<AssessmentIdParams>) -> Result<CallToolResult, McpError> {
        let result = assessments::delete_assessment(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Recompute an assessment's calculated values from its stored form")]
    fn recalculate_assessment(&self, Parameters(p): Parameters<AssessmentIdParams>) -> Result<CallToolResult, McpError> {
        let result = assessments::recalculate_assessment(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(summary) => serde_json::to_string_pretty(&summary),
            None => Ok(format!(r#"{{"error": "Assessment not found", "id": {}}}"#, p.id)),
        }
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Push assessments that are pending or failed to the remote store")]
    async fn retry_remote_sync(&self, Parameters(p): Parameters<RetrySyncParams>) -> Result<CallToolResult, McpError> {
        let result = assessments::retry_remote_sync(&self.database, self.remote.as_ref(), p.limit)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Cohort statistics over all stored assessments: age, sex, race, smoking, sarcopenia and SARC-F distributions, average BMI and waist-hip ratio, physical activity percentage")]
    fn get_statistics(&self) -> Result<CallToolResult, McpError> {
        let result = statistics::get_statistics(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

#[tool_handler]
impl ServerHandler for SarcService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sarcopenia-intake".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Sarcopenia Intake Manager".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Sarcopenia Intake Manager - sarcopenia risk assessment intake. \
                 IMPORTANT: Call intake_instructions before recording an assessment. \
                 Calculators: compute_body_metrics, compute_smoking_exposure, resolve_alcohol_profile, \
                 classify_sarcopenia, score_sarc_f, summarize_activity. \
                 Assessments: preview_assessment, submit_assessment, get/list/delete_assessment, \
                 recalculate_assessment, retry_remote_sync. \
                 Cohort: get_statistics. Status: sarc_status."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{AlcoholStatus, Race, Sex, SmokingStatus};

    #[test]
    fn test_form_params_convert() {
        let params: AssessmentFormParams = serde_json::from_value(serde_json::json!({
            "age": 72,
            "sex": "feminino",
            "race": "pardo",
            "smoking": {"status": "ex-fumante", "start_age": 20, "quit_age": 50, "cigarettes_per_day": 10},
            "alcohol": {"status": "never", "current_frequency": 3},
            "medications": [{"name": "Losartan"}],
            "sarc_f": {"strength": 1, "falls": 0}
        }))
        .unwrap();

        let form = params.into_form().unwrap();
        assert_eq!(form.sex, Some(Sex::Female));
        assert_eq!(form.race, Some(Race::Mixed));
        assert_eq!(form.smoking.status, SmokingStatus::Former);
        assert_eq!(form.alcohol.status, AlcoholStatus::Never);
        assert_eq!(form.medications.len(), 1);
        assert_eq!(form.sarc_f.strength, Some(1));
        assert_eq!(form.sarc_f.stair_climbing, None);
    }

    #[test]
    fn test_form_params_reject_unknown_enum() {
        let params = AssessmentFormParams {
            sex: Some("other".to_string()),
            ..Default::default()
        };
        assert!(params.into_form().unwrap_err().contains("Invalid sex"));
    }
}
