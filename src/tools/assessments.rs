//! Assessment MCP Tools
//!
//! Tools for previewing, submitting and managing stored intake assessments.

use serde::Serialize;

use crate::calc;
use crate::db::Database;
use crate::models::{
    Assessment, AssessmentCreate, AssessmentMedication, DerivedMetrics, RemoteStatus,
};
use crate::remote::{RemoteAssessmentRow, RemoteError, RemoteStore};

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 500;

/// Response for preview_assessment
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    /// The form as it would be stored
    pub form: AssessmentCreate,
    pub derived: DerivedMetrics,
    /// Why the sarcopenia stage is still unset, if it is
    pub sarcopenia_pending: Option<String>,
}

/// Assessment summary for listing
#[derive(Debug, Serialize)]
pub struct AssessmentSummary {
    pub id: i64,
    pub age: Option<f64>,
    pub sex: Option<String>,
    pub race: Option<String>,
    pub bmi: Option<f64>,
    pub bmi_status: Option<String>,
    pub sarcopenia_stage: Option<String>,
    pub sarc_f_total: Option<u8>,
    pub sarc_f_interpretation: Option<String>,
    pub remote_status: String,
    pub created_at: String,
}

impl From<&Assessment> for AssessmentSummary {
    fn from(a: &Assessment) -> Self {
        Self {
            id: a.id,
            age: a.age,
            sex: a.sex.map(|s| s.as_str().to_string()),
            race: a.race.map(|r| r.as_str().to_string()),
            bmi: a.cached_bmi,
            bmi_status: a.cached_bmi_status.map(|s| s.display_name().to_string()),
            sarcopenia_stage: a
                .cached_sarcopenia_stage
                .map(|s| s.display_name().to_string()),
            sarc_f_total: a.cached_sarc_f_total,
            sarc_f_interpretation: a
                .cached_sarc_f_interpretation
                .map(|i| i.display_name().to_string()),
            remote_status: a.remote_status.as_str().to_string(),
            created_at: a.created_at.clone(),
        }
    }
}

/// Full assessment detail
#[derive(Debug, Serialize)]
pub struct AssessmentDetail {
    pub id: i64,
    pub form: AssessmentCreate,
    pub derived: DerivedMetrics,
    pub medications: Vec<AssessmentMedication>,
    pub remote_status: String,
    pub remote_id: Option<String>,
    pub remote_error: Option<String>,
    pub remote_synced_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Response for list_assessments
#[derive(Debug, Serialize)]
pub struct ListAssessmentsResponse {
    pub assessments: Vec<AssessmentSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Outcome of pushing one assessment to the remote store
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub assessment_id: i64,
    pub remote_status: String,
    pub remote_id: Option<String>,
    /// Why the push failed, or what a synced push left out
    pub error: Option<String>,
}

/// Response for submit_assessment
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub id: i64,
    pub derived: DerivedMetrics,
    pub remote: SyncOutcome,
    pub message: String,
}

/// Response for retry_remote_sync
#[derive(Debug, Serialize)]
pub struct RetrySyncResponse {
    pub attempted: usize,
    pub synced: usize,
    pub failed: usize,
    pub results: Vec<SyncOutcome>,
}

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

fn db_error(e: crate::db::DbError) -> String {
    format!("Database error: {}", e)
}

/// Compute everything the form shows, without saving
pub fn preview_assessment(form: AssessmentCreate) -> PreviewResponse {
    let form = form.normalized();
    let derived = DerivedMetrics::compute(&form);
    let sarcopenia_pending = calc::try_assess_sarcopenia(&form.functional_test_input())
        .err()
        .map(|e| e.to_string());

    PreviewResponse {
        form,
        derived,
        sarcopenia_pending,
    }
}

/// Push one saved assessment and record the result on its row.
///
/// Remote failures are logged and recorded, never returned as errors; only a
/// failure to update the local row is.
pub async fn push_to_remote(
    db: &Database,
    remote: &dyn RemoteStore,
    assessment: &Assessment,
) -> Result<SyncOutcome, String> {
    let id = assessment.id;

    if !remote.is_enabled() {
        db.with_conn(|conn| Assessment::mark_remote_disabled(conn, id))
            .map_err(db_error)?;
        return Ok(SyncOutcome {
            assessment_id: id,
            remote_status: RemoteStatus::Disabled.as_str().to_string(),
            remote_id: None,
            error: None,
        });
    }

    let missing = RemoteAssessmentRow::missing_required(assessment);
    if !missing.is_empty() {
        return record_failure(db, remote, id, RemoteError::IncompleteRow(missing));
    }

    let medications = db
        .with_conn(|conn| AssessmentMedication::list_for_assessment(conn, id))
        .map_err(db_error)?;

    match remote.push_assessment(assessment, &medications).await {
        Ok(receipt) => {
            db.with_conn(|conn| {
                Assessment::mark_remote_synced(
                    conn,
                    id,
                    Some(&receipt.remote_id),
                    receipt.warning.as_deref(),
                )
            })
            .map_err(db_error)?;
            Ok(SyncOutcome {
                assessment_id: id,
                remote_status: RemoteStatus::Synced.as_str().to_string(),
                remote_id: Some(receipt.remote_id),
                error: receipt.warning,
            })
        }
        Err(e) => record_failure(db, remote, id, e),
    }
}

fn record_failure(
    db: &Database,
    remote: &dyn RemoteStore,
    id: i64,
    error: RemoteError,
) -> Result<SyncOutcome, String> {
    let message = error.to_string();
    tracing::warn!(
        assessment_id = id,
        store = remote.name(),
        error = %message,
        "remote save failed; assessment kept locally"
    );
    db.with_conn(|conn| Assessment::mark_remote_failed(conn, id, &message))
        .map_err(db_error)?;
    Ok(SyncOutcome {
        assessment_id: id,
        remote_status: RemoteStatus::Failed.as_str().to_string(),
        remote_id: None,
        error: Some(message),
    })
}

/// Save a completed form locally, then push it to the remote store
pub async fn submit_assessment(
    db: &Database,
    remote: &dyn RemoteStore,
    form: AssessmentCreate,
) -> Result<SubmitResponse, String> {
    let form = form.normalized();
    let saved = db
        .with_conn(|conn| Assessment::create(conn, &form))
        .map_err(|e| format!("Failed to save assessment: {}", e))?;
    tracing::info!(assessment_id = saved.id, "assessment saved");

    let outcome = push_to_remote(db, remote, &saved).await?;
    let message = match (outcome.remote_status.as_str(), outcome.error.as_deref()) {
        ("synced", None) => "Assessment saved locally and in the remote store".to_string(),
        ("synced", Some(warning)) => format!(
            "Assessment saved locally and in the remote store, but {}",
            warning
        ),
        ("disabled", _) => "Assessment saved locally (no remote store configured)".to_string(),
        _ => format!(
            "Assessment saved locally, but the remote save may have failed; retry with retry_remote_sync (id {})",
            saved.id
        ),
    };

    Ok(SubmitResponse {
        id: saved.id,
        derived: saved.derived(),
        remote: outcome,
        message,
    })
}

/// Get an assessment by ID
pub fn get_assessment(db: &Database, id: i64) -> Result<Option<AssessmentDetail>, String> {
    let conn = db.get_conn().map_err(db_error)?;

    let Some(assessment) = Assessment::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get assessment: {}", e))?
    else {
        return Ok(None);
    };
    let medications =
        AssessmentMedication::list_for_assessment(&conn, id).map_err(db_error)?;

    Ok(Some(AssessmentDetail {
        id: assessment.id,
        derived: assessment.derived(),
        form: assessment.form,
        medications,
        remote_status: assessment.remote_status.as_str().to_string(),
        remote_id: assessment.remote_id,
        remote_error: assessment.remote_error,
        remote_synced_at: assessment.remote_synced_at,
        created_at: assessment.created_at,
        updated_at: assessment.updated_at,
    }))
}

/// List assessments, newest first
pub fn list_assessments(
    db: &Database,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<ListAssessmentsResponse, String> {
    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
    let offset = offset.unwrap_or(0).max(0);

    let conn = db.get_conn().map_err(db_error)?;
    let assessments = Assessment::list(&conn, limit, offset)
        .map_err(|e| format!("Failed to list assessments: {}", e))?;
    let total = Assessment::count(&conn).map_err(db_error)?;

    Ok(ListAssessmentsResponse {
        assessments: assessments.iter().map(AssessmentSummary::from).collect(),
        total,
        limit,
        offset,
    })
}

/// Delete an assessment and its medications (local only)
pub fn delete_assessment(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(db_error)?;
    let deleted = Assessment::delete(&conn, id)
        .map_err(|e| format!("Failed to delete assessment: {}", e))?;

    if deleted {
        tracing::info!(assessment_id = id, "assessment deleted");
        Ok(DeleteResponse {
            success: true,
            message: format!("Assessment {} deleted", id),
        })
    } else {
        Ok(DeleteResponse {
            success: false,
            message: format!("Assessment not found with id: {}", id),
        })
    }
}

/// Rebuild an assessment's cached metrics from its stored form
pub fn recalculate_assessment(db: &Database, id: i64) -> Result<Option<AssessmentSummary>, String> {
    let conn = db.get_conn().map_err(db_error)?;
    let updated = Assessment::recalculate_derived(&conn, id)
        .map_err(|e| format!("Failed to recalculate assessment: {}", e))?;
    Ok(updated.as_ref().map(AssessmentSummary::from))
}

/// Push assessments that are not yet in the remote store, oldest first
pub async fn retry_remote_sync(
    db: &Database,
    remote: &dyn RemoteStore,
    limit: Option<i64>,
) -> Result<RetrySyncResponse, String> {
    if !remote.is_enabled() {
        return Err("No remote store is configured; set SARC_REMOTE_URL and SARC_REMOTE_API_KEY".to_string());
    }

    let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
    let pending = db
        .with_conn(|conn| Assessment::list_pending_remote(conn, limit))
        .map_err(db_error)?;

    let mut results = Vec::with_capacity(pending.len());
    for assessment in &pending {
        results.push(push_to_remote(db, remote, assessment).await?);
    }

    let synced = results
        .iter()
        .filter(|r| r.remote_status == RemoteStatus::Synced.as_str())
        .count();

    Ok(RetrySyncResponse {
        attempted: results.len(),
        synced,
        failed: results.len() - synced,
        results,
    })
}
