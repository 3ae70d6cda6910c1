//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!(version = 1, "applied schema migration");
    }

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Whether the database is at the version this build expects
pub fn is_current(conn: &Connection) -> DbResult<bool> {
    Ok(get_schema_version(conn)? == SCHEMA_VERSION)
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- ASSESSMENTS
        -- One submitted intake form. The full form is kept as JSON;
        -- demographic and derived columns are cached for listing and
        -- statistics and are rebuilt by recalculation.
        -- ============================================
        CREATE TABLE assessments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,

            -- Demographics
            age REAL,
            sex TEXT CHECK(sex IN ('male', 'female')),
            race TEXT CHECK(race IN ('white', 'black', 'mixed', 'asian', 'indigenous')),
            smoking_status TEXT NOT NULL DEFAULT 'never',
            alcohol_status TEXT NOT NULL DEFAULT 'never',
            physical_activity INTEGER NOT NULL DEFAULT 0,   -- boolean

            -- Cached derived metrics
            cached_bmi REAL,
            cached_bmi_status TEXT,
            cached_waist_hip_ratio REAL,
            cached_pack_years REAL,
            cached_weekly_standard_drinks REAL,
            cached_alcohol_risk TEXT,
            cached_ammi REAL,
            cached_sarcopenia_stage TEXT,
            cached_sarc_f_total INTEGER,
            cached_sarc_f_interpretation TEXT,
            cached_met_minutes REAL,

            -- Full intake form (JSON)
            form_json TEXT NOT NULL,

            -- Remote store sync
            remote_status TEXT NOT NULL DEFAULT 'pending'
                CHECK(remote_status IN ('pending', 'synced', 'failed', 'disabled')),
            remote_id TEXT,
            remote_error TEXT,
            remote_synced_at TEXT,

            -- Metadata
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_assessments_created ON assessments(created_at);
        CREATE INDEX idx_assessments_remote_status ON assessments(remote_status);

        -- ============================================
        -- ASSESSMENT MEDICATIONS
        -- Medications reported on an assessment
        -- ============================================
        CREATE TABLE assessment_medications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            assessment_id INTEGER NOT NULL REFERENCES assessments(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            dosage TEXT,
            frequency TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_assessment_medications_assessment
            ON assessment_medications(assessment_id);
        "#,
    )?;

    Ok(())
}
