//! Remote assessment store
//!
//! Submitted assessments are saved locally first and then pushed to a remote
//! relational store. The push is best-effort: a failure is recorded on the
//! local row and can be retried later.

pub mod postgrest;
pub mod row;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Assessment, AssessmentMedication};

pub use postgrest::PostgrestStore;
pub use row::{RemoteAssessmentRow, RemoteMedicationRow};

/// Remote store error types
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote store rejected the insert ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Remote store did not return an id for the inserted assessment")]
    MissingId,

    #[error("No remote store is configured")]
    Disabled,

    #[error("Not pushed: the remote store requires {}", .0.join(", "))]
    IncompleteRow(Vec<&'static str>),
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// What the remote store kept of a pushed assessment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReceipt {
    pub remote_id: String,
    /// Set when the assessment row was inserted but something attached to it was not
    pub warning: Option<String>,
}

impl PushReceipt {
    pub fn complete(remote_id: impl Into<String>) -> Self {
        Self {
            remote_id: remote_id.into(),
            warning: None,
        }
    }
}

/// A destination for submitted assessments
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Short name for logs and status output
    fn name(&self) -> &'static str;

    /// Whether pushes should be attempted at all
    fn is_enabled(&self) -> bool {
        true
    }

    /// Insert one assessment and its medications.
    ///
    /// Errors mean the assessment row itself was not stored. A partial push
    /// (assessment stored, medications not) is an `Ok` receipt with a warning.
    async fn push_assessment(
        &self,
        assessment: &Assessment,
        medications: &[AssessmentMedication],
    ) -> RemoteResult<PushReceipt>;
}

/// Used when no remote URL is configured; assessments stay local only
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStore;

#[async_trait]
impl RemoteStore for DisabledStore {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn push_assessment(
        &self,
        _assessment: &Assessment,
        _medications: &[AssessmentMedication],
    ) -> RemoteResult<PushReceipt> {
        Err(RemoteError::Disabled)
    }
}
