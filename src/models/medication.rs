//! Medication model
//!
//! Medications the respondent reports on the intake form. The form carries
//! them as `MedicationEntry` values; once an assessment is saved each entry
//! becomes an `AssessmentMedication` row linked to it.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// One medication line on the intake form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicationEntry {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
}

/// A stored medication belonging to an assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentMedication {
    pub id: i64,
    pub assessment_id: i64,
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub created_at: String,
}

impl AssessmentMedication {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            assessment_id: row.get("assessment_id")?,
            name: row.get("name")?,
            dosage: row.get("dosage")?,
            frequency: row.get("frequency")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert every entry for an assessment
    pub fn create_all(
        conn: &Connection,
        assessment_id: i64,
        entries: &[MedicationEntry],
    ) -> DbResult<usize> {
        let mut stmt = conn.prepare(
            r#"
            INSERT INTO assessment_medications (assessment_id, name, dosage, frequency)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )?;

        let mut inserted = 0;
        for entry in entries {
            inserted += stmt.execute(params![
                assessment_id,
                entry.name.trim(),
                entry.dosage,
                entry.frequency,
            ])?;
        }

        Ok(inserted)
    }

    /// List medications for an assessment in entry order
    pub fn list_for_assessment(conn: &Connection, assessment_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM assessment_medications WHERE assessment_id = ?1 ORDER BY id",
        )?;
        let meds = stmt
            .query_map([assessment_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meds)
    }
}
