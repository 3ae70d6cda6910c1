//! Status Tool
//!
//! Provides runtime status information about the intake server, plus the
//! workflow guide handed to AI assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::{migrations, Database};
use crate::models::Assessment;

/// Intake workflow instructions for AI assistants
pub const INTAKE_INSTRUCTIONS: &str = r#"
# Sarcopenia Intake Instructions

This guide explains how to record a sarcopenia risk assessment with these tools.

## Overview

An assessment is one completed intake form. It has these sections:
1. **Biological** - age, sex (male/female), race (white, black, mixed, asian, indigenous)
2. **Physical activity (IPAQ)** - light walking, moderate and vigorous activity (days/week, minutes/day), sitting time
3. **Lifestyle** - smoking and alcohol
4. **Health conditions** - chronic diseases and medications
5. **Anthropometric** - weight (kg), height (cm), waist, hip and calf circumference (cm)
6. **Body composition** - skeletal muscle, fat mass, visceral fat, body age, daily kcal
7. **Muscular function** - hand grip (kg), 5x sit-to-stand (seconds), gait speed (m/s)
8. **SARC-F** - five items scored 0-2

Everything marked "calculated" is derived by the server. Never compute it yourself.

## Workflow

1. Collect the form section by section. Partial answers are fine.
2. Call `preview_assessment(form)` to see the calculated values and what is still missing.
3. When the respondent is done, call `submit_assessment(form)`.
   - The assessment is always saved locally first.
   - If a remote store is configured it is pushed there too. A failed push does not lose data;
     the response says so and `retry_remote_sync()` pushes it again later.

## Calculated Values

| Value | Rule |
|-------|------|
| BMI | weight / (height in m)², 2 decimals |
| BMI status | <18.5 underweight, <25 normal, <30 overweight, <35 obese I, <40 obese II, else obese III |
| Waist-hip ratio | waist / hip, 2 decimals |
| Pack-years | cigarettes per day / 20 × years smoked (to current age, or quit age for former smokers) |
| Weekly standard drinks | occasions per week × doses × 14 / 7 |
| Alcohol risk | harmful above 20/week (female) or 40/week (male), otherwise moderate |
| AMMI | (0.244·weight + 7.8·height_m + 6.6·sex − 0.098·age + race − 3.3) / height_m² |
| SARC-F | 0-5 no signs, 6-10 suggestive of sarcopenia |

### Sarcopenia Stage

Needs sex, age, race, weight, height, grip, sit-to-stand and gait speed. Low muscle mass is
AMMI < 7.0 (male) or < 5.5 (female). Low grip is < 27 kg (male) or < 16 kg (female).
Slow gait is ≤ 0.8 m/s. Poor sit-to-stand is > 15 s.

| Condition | Stage |
|-----------|-------|
| Muscle mass not low | no sarcopenia |
| Low mass, all function tests normal | pre-sarcopenic |
| Low mass and slow gait | severe sarcopenia |
| Low mass, other function test abnormal | sarcopenic |

## Quick Reference

| Task | Tool |
|------|------|
| Check one section | `compute_body_metrics`, `compute_smoking_exposure`, `resolve_alcohol_profile`, `classify_sarcopenia`, `score_sarc_f`, `summarize_activity` |
| Preview a whole form | `preview_assessment` |
| Save a form | `submit_assessment` |
| View / list | `get_assessment`, `list_assessments` |
| Fix stale calculated values | `recalculate_assessment` |
| Re-push to remote store | `retry_remote_sync` |
| Cohort summary | `get_statistics` |
| Delete (local only) | `delete_assessment` |

## Notes

- Alcohol status "never" clears every other alcohol field.
- Portuguese labels are accepted for enums (masculino, feminino, branco, pardo, fumante, ex-fumante, ...).
- Gait speed is in metres per second, not seconds.
- The remote store needs age, sex and race. Forms without them are saved locally only.
"#;

/// Runtime status of the intake server
#[derive(Debug, Clone, Serialize)]
pub struct SarcStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub assessment_count: Option<i64>,
    pub schema_version: Option<i32>,
    /// False when the file predates this build's migrations
    pub schema_current: Option<bool>,

    /// Remote store
    pub remote_store: &'static str,
    pub remote_enabled: bool,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(
        &self,
        db: &Database,
        remote_store: &'static str,
        remote_enabled: bool,
    ) -> SarcStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());
        let assessment_count = db.with_conn(Assessment::count).ok();
        let schema_version = db.with_conn(migrations::get_schema_version).ok();
        let schema_current = db.with_conn(migrations::is_current).ok();

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        SarcStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            assessment_count,
            schema_version,
            schema_current,
            remote_store,
            remote_enabled,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
