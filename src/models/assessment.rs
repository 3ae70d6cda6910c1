//! Assessment model
//!
//! A saved intake form together with the derived metrics computed from it and
//! its sync state against the remote store.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::calc::{
    AlcoholStatus, BmiStatus, Race, RiskTier, SarcFInterpretation, SarcopeniaStage, Sex,
    SmokingStatus,
};
use crate::db::{DbError, DbResult};

use super::{AssessmentCreate, AssessmentMedication, DerivedMetrics};

/// Remote store sync state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteStatus {
    /// Saved locally, not yet pushed
    Pending,
    Synced,
    /// Last push attempt failed; see `remote_error`
    Failed,
    /// No remote store was configured when it was saved
    Disabled,
}

impl RemoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteStatus::Pending => "pending",
            RemoteStatus::Synced => "synced",
            RemoteStatus::Failed => "failed",
            RemoteStatus::Disabled => "disabled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(RemoteStatus::Pending),
            "synced" => Some(RemoteStatus::Synced),
            "failed" => Some(RemoteStatus::Failed),
            "disabled" => Some(RemoteStatus::Disabled),
            _ => None,
        }
    }
}

/// A stored assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: i64,
    pub age: Option<f64>,
    pub sex: Option<Sex>,
    pub race: Option<Race>,
    pub smoking_status: SmokingStatus,
    pub alcohol_status: AlcoholStatus,
    pub physical_activity: bool,

    pub cached_bmi: Option<f64>,
    pub cached_bmi_status: Option<BmiStatus>,
    pub cached_waist_hip_ratio: Option<f64>,
    pub cached_pack_years: Option<f64>,
    pub cached_weekly_standard_drinks: Option<f64>,
    pub cached_alcohol_risk: Option<RiskTier>,
    pub cached_ammi: Option<f64>,
    pub cached_sarcopenia_stage: Option<SarcopeniaStage>,
    pub cached_sarc_f_total: Option<u8>,
    pub cached_sarc_f_interpretation: Option<SarcFInterpretation>,
    pub cached_met_minutes: Option<f64>,

    pub form: AssessmentCreate,

    pub remote_status: RemoteStatus,
    pub remote_id: Option<String>,
    pub remote_error: Option<String>,
    pub remote_synced_at: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

/// Read an optional enum column through its `from_str`
fn enum_column<T>(row: &Row, column: &str, parse: fn(&str) -> Option<T>) -> rusqlite::Result<Option<T>> {
    let value: Option<String> = row.get(column)?;
    Ok(value.as_deref().and_then(parse))
}

impl Assessment {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let form_json: String = row.get("form_json")?;
        let form: AssessmentCreate = serde_json::from_str(&form_json).map_err(|e| {
            let idx = row.as_ref().column_index("form_json").unwrap_or(0);
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
        })?;

        let physical_activity: i32 = row.get("physical_activity")?;

        Ok(Self {
            id: row.get("id")?,
            age: row.get("age")?,
            sex: enum_column(row, "sex", Sex::from_str)?,
            race: enum_column(row, "race", Race::from_str)?,
            smoking_status: enum_column(row, "smoking_status", SmokingStatus::from_str)?
                .unwrap_or(SmokingStatus::Never),
            alcohol_status: enum_column(row, "alcohol_status", AlcoholStatus::from_str)?
                .unwrap_or(AlcoholStatus::Never),
            physical_activity: physical_activity != 0,
            cached_bmi: row.get("cached_bmi")?,
            cached_bmi_status: enum_column(row, "cached_bmi_status", BmiStatus::from_str)?,
            cached_waist_hip_ratio: row.get("cached_waist_hip_ratio")?,
            cached_pack_years: row.get("cached_pack_years")?,
            cached_weekly_standard_drinks: row.get("cached_weekly_standard_drinks")?,
            cached_alcohol_risk: enum_column(row, "cached_alcohol_risk", RiskTier::from_str)?,
            cached_ammi: row.get("cached_ammi")?,
            cached_sarcopenia_stage: enum_column(
                row,
                "cached_sarcopenia_stage",
                SarcopeniaStage::from_str,
            )?,
            cached_sarc_f_total: row.get("cached_sarc_f_total")?,
            cached_sarc_f_interpretation: enum_column(
                row,
                "cached_sarc_f_interpretation",
                SarcFInterpretation::from_str,
            )?,
            cached_met_minutes: row.get("cached_met_minutes")?,
            form,
            remote_status: enum_column(row, "remote_status", RemoteStatus::from_str)?
                .unwrap_or(RemoteStatus::Pending),
            remote_id: row.get("remote_id")?,
            remote_error: row.get("remote_error")?,
            remote_synced_at: row.get("remote_synced_at")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Derived metrics recomputed from the stored form
    pub fn derived(&self) -> DerivedMetrics {
        DerivedMetrics::compute(&self.form)
    }

    /// Save a new assessment with its medications.
    ///
    /// The form is stored as given; callers normalize it first.
    pub fn create(conn: &Connection, form: &AssessmentCreate) -> DbResult<Self> {
        let derived = DerivedMetrics::compute(form);
        let form_json = serde_json::to_string(form)?;

        let tx = conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO assessments (
                age, sex, race, smoking_status, alcohol_status, physical_activity,
                cached_bmi, cached_bmi_status, cached_waist_hip_ratio, cached_pack_years,
                cached_weekly_standard_drinks, cached_alcohol_risk, cached_ammi,
                cached_sarcopenia_stage, cached_sarc_f_total, cached_sarc_f_interpretation,
                cached_met_minutes, form_json
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
            "#,
            params![
                form.age,
                form.sex.map(|s| s.as_str()),
                form.race.map(|r| r.as_str()),
                form.smoking.status.as_str(),
                form.alcohol.status.as_str(),
                form.physical_activity as i32,
                derived.bmi,
                derived.bmi_status.map(|s| s.as_str()),
                derived.waist_hip_ratio,
                derived.pack_years,
                derived.weekly_standard_drinks,
                derived.alcohol_risk.map(|t| t.as_str()),
                derived.sarcopenia.as_ref().map(|s| s.ammi),
                derived.sarcopenia.as_ref().map(|s| s.stage.as_str()),
                derived.sarc_f.map(|s| s.total),
                derived.sarc_f.map(|s| s.interpretation.as_str()),
                derived.activity.met_minutes,
                form_json,
            ],
        )?;

        let id = tx.last_insert_rowid();
        AssessmentMedication::create_all(&tx, id, &form.medications)?;
        tx.commit()?;

        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound(id))
    }

    /// Get an assessment by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM assessments WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(assessment) => Ok(Some(assessment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List assessments, newest first
    pub fn list(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM assessments ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?;
        let assessments = stmt
            .query_map([limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(assessments)
    }

    /// Every assessment, oldest first
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM assessments ORDER BY id")?;
        let assessments = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(assessments)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM assessments", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete an assessment (medications cascade)
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM assessments WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Recompute the cached derived columns from the stored form
    pub fn recalculate_derived(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let Some(existing) = Self::get_by_id(conn, id)? else {
            return Ok(None);
        };
        let derived = existing.derived();

        conn.execute(
            r#"
            UPDATE assessments SET
                cached_bmi = ?1,
                cached_bmi_status = ?2,
                cached_waist_hip_ratio = ?3,
                cached_pack_years = ?4,
                cached_weekly_standard_drinks = ?5,
                cached_alcohol_risk = ?6,
                cached_ammi = ?7,
                cached_sarcopenia_stage = ?8,
                cached_sarc_f_total = ?9,
                cached_sarc_f_interpretation = ?10,
                cached_met_minutes = ?11,
                updated_at = datetime('now')
            WHERE id = ?12
            "#,
            params![
                derived.bmi,
                derived.bmi_status.map(|s| s.as_str()),
                derived.waist_hip_ratio,
                derived.pack_years,
                derived.weekly_standard_drinks,
                derived.alcohol_risk.map(|t| t.as_str()),
                derived.sarcopenia.as_ref().map(|s| s.ammi),
                derived.sarcopenia.as_ref().map(|s| s.stage.as_str()),
                derived.sarc_f.map(|s| s.total),
                derived.sarc_f.map(|s| s.interpretation.as_str()),
                derived.activity.met_minutes,
                id,
            ],
        )?;

        Self::get_by_id(conn, id)
    }

    /// Recompute cached columns for every assessment; returns how many were updated
    pub fn recalculate_all(conn: &Connection) -> DbResult<usize> {
        let ids: Vec<i64> = {
            let mut stmt = conn.prepare("SELECT id FROM assessments ORDER BY id")?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            ids
        };

        let mut updated = 0;
        for id in ids {
            if Self::recalculate_derived(conn, id)?.is_some() {
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Record a successful push to the remote store.
    ///
    /// `warning` is kept in `remote_error` when part of the push (medications)
    /// did not make it; the row still counts as synced.
    pub fn mark_remote_synced(
        conn: &Connection,
        id: i64,
        remote_id: Option<&str>,
        warning: Option<&str>,
    ) -> DbResult<bool> {
        let synced_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let rows = conn.execute(
            r#"
            UPDATE assessments
            SET remote_status = 'synced', remote_id = ?1, remote_error = ?2,
                remote_synced_at = ?3, updated_at = datetime('now')
            WHERE id = ?4
            "#,
            params![remote_id, warning, synced_at, id],
        )?;
        Ok(rows > 0)
    }

    /// Record a failed push; the assessment stays saved locally
    pub fn mark_remote_failed(conn: &Connection, id: i64, error: &str) -> DbResult<bool> {
        let rows = conn.execute(
            r#"
            UPDATE assessments
            SET remote_status = 'failed', remote_error = ?1, updated_at = datetime('now')
            WHERE id = ?2
            "#,
            params![error, id],
        )?;
        Ok(rows > 0)
    }

    pub fn mark_remote_disabled(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            r#"
            UPDATE assessments
            SET remote_status = 'disabled', updated_at = datetime('now')
            WHERE id = ?1
            "#,
            [id],
        )?;
        Ok(rows > 0)
    }

    /// Assessments not yet in the remote store (pending, failed or disabled), oldest first
    pub fn list_pending_remote(conn: &Connection, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM assessments WHERE remote_status != 'synced' ORDER BY id LIMIT ?1",
        )?;
        let assessments = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(assessments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::test_support::{minimal_form, sample_form};

    #[test]
    fn test_create_caches_derived_metrics() {
        let db = Database::in_memory().unwrap();
        let form = sample_form();

        let saved = db.with_conn(|conn| Assessment::create(conn, &form)).unwrap();

        assert_eq!(saved.sex, Some(Sex::Female));
        assert_eq!(saved.smoking_status, SmokingStatus::Former);
        assert!(saved.physical_activity);
        assert_eq!(saved.cached_bmi, Some(16.02));
        assert_eq!(saved.cached_bmi_status, Some(BmiStatus::Underweight));
        assert_eq!(saved.cached_pack_years, Some(10.0));
        assert_eq!(saved.cached_alcohol_risk, Some(RiskTier::Moderate));
        assert_eq!(saved.cached_sarcopenia_stage, Some(SarcopeniaStage::SevereSarcopenic));
        assert_eq!(saved.cached_sarc_f_total, Some(6));
        assert_eq!(saved.remote_status, RemoteStatus::Pending);
        assert_eq!(saved.form, form);
    }

    #[test]
    fn test_create_stores_medications() {
        let db = Database::in_memory().unwrap();
        let saved = db
            .with_conn(|conn| Assessment::create(conn, &sample_form()))
            .unwrap();

        let meds = db
            .with_conn(|conn| AssessmentMedication::list_for_assessment(conn, saved.id))
            .unwrap();
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].name, "Losartan");
        assert_eq!(meds[0].dosage.as_deref(), Some("50mg"));
    }

    #[test]
    fn test_missing_inputs_leave_cache_unset() {
        let db = Database::in_memory().unwrap();
        let saved = db
            .with_conn(|conn| Assessment::create(conn, &minimal_form(70.0, Sex::Male, Race::Black)))
            .unwrap();

        assert_eq!(saved.cached_bmi, None);
        assert_eq!(saved.cached_sarcopenia_stage, None);
        assert_eq!(saved.cached_sarc_f_total, None);
        assert_eq!(saved.cached_alcohol_risk, Some(RiskTier::Never));
    }

    #[test]
    fn test_get_list_count_delete() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            let a = Assessment::create(conn, &minimal_form(30.0, Sex::Male, Race::White))?;
            let b = Assessment::create(conn, &minimal_form(75.0, Sex::Female, Race::Asian))?;

            assert_eq!(Assessment::count(conn)?, 2);
            let listed = Assessment::list(conn, 10, 0)?;
            assert_eq!(listed.len(), 2);
            assert_eq!(listed[0].id, b.id);

            assert!(Assessment::delete(conn, a.id)?);
            assert!(!Assessment::delete(conn, a.id)?);
            assert!(Assessment::get_by_id(conn, a.id)?.is_none());
            assert_eq!(Assessment::count(conn)?, 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_delete_cascades_medications() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            let saved = Assessment::create(conn, &sample_form())?;
            Assessment::delete(conn, saved.id)?;
            assert!(AssessmentMedication::list_for_assessment(conn, saved.id)?.is_empty());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_recalculate_rebuilds_stale_cache() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            let saved = Assessment::create(conn, &sample_form())?;
            conn.execute(
                "UPDATE assessments SET cached_bmi = 99.0, cached_sarcopenia_stage = NULL WHERE id = ?1",
                [saved.id],
            )?;

            let fixed = Assessment::recalculate_derived(conn, saved.id)?.unwrap();
            assert_eq!(fixed.cached_bmi, Some(16.02));
            assert_eq!(fixed.cached_sarcopenia_stage, Some(SarcopeniaStage::SevereSarcopenic));

            assert!(Assessment::recalculate_derived(conn, 9999)?.is_none());
            assert_eq!(Assessment::recalculate_all(conn)?, 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_remote_status_transitions() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            let saved = Assessment::create(conn, &sample_form())?;
            assert_eq!(Assessment::list_pending_remote(conn, 10)?.len(), 1);

            Assessment::mark_remote_failed(conn, saved.id, "connection refused")?;
            let failed = Assessment::get_by_id(conn, saved.id)?.unwrap();
            assert_eq!(failed.remote_status, RemoteStatus::Failed);
            assert_eq!(failed.remote_error.as_deref(), Some("connection refused"));
            assert_eq!(Assessment::list_pending_remote(conn, 10)?.len(), 1);

            Assessment::mark_remote_synced(conn, saved.id, Some("42"), None)?;
            let synced = Assessment::get_by_id(conn, saved.id)?.unwrap();
            assert_eq!(synced.remote_status, RemoteStatus::Synced);
            assert_eq!(synced.remote_id.as_deref(), Some("42"));
            assert_eq!(synced.remote_error, None);
            assert!(synced.remote_synced_at.is_some());
            assert!(Assessment::list_pending_remote(conn, 10)?.is_empty());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_partial_push_keeps_warning() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            let saved = Assessment::create(conn, &sample_form())?;
            Assessment::mark_remote_synced(
                conn,
                saved.id,
                Some("42"),
                Some("medications not pushed: timeout"),
            )?;

            let synced = Assessment::get_by_id(conn, saved.id)?.unwrap();
            assert_eq!(synced.remote_status, RemoteStatus::Synced);
            assert_eq!(
                synced.remote_error.as_deref(),
                Some("medications not pushed: timeout")
            );
            // Not re-pushed: the remote assessment row exists
            assert!(Assessment::list_pending_remote(conn, 10)?.is_empty());
            Ok(())
        })
        .unwrap();
    }
}
