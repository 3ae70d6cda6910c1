//! PostgREST-backed remote store
//!
//! Inserts rows through the REST endpoint of a hosted Postgres project
//! (`{base_url}/rest/v1/{table}`), authenticating with an anon/service key
//! sent both as `apikey` and as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;

use crate::models::{Assessment, AssessmentMedication};

use super::{
    PushReceipt, RemoteAssessmentRow, RemoteError, RemoteMedicationRow, RemoteResult, RemoteStore,
};

const ASSESSMENTS_TABLE: &str = "sarcopeniaAssessments";
const MEDICATIONS_TABLE: &str = "medications";

pub struct PostgrestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PostgrestStore {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> RemoteResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        // Keys with characters not valid in a header are left out; the store then answers 401.
        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers
    }

    /// POST rows to a table and return the inserted representation
    async fn insert<T: Serialize + ?Sized>(&self, table: &str, body: &T) -> RemoteResult<Value> {
        let response = self
            .client
            .post(self.table_url(table))
            .headers(self.headers())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Id of the first row in a PostgREST insert response (uuid or integer)
pub fn extract_inserted_id(inserted: &Value) -> Option<String> {
    let row = match inserted {
        Value::Array(rows) => rows.first()?,
        other => other,
    };
    match row.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Recorded as the row's `remote_error` after a partial push
pub fn medications_not_pushed(error: &RemoteError) -> String {
    format!("medications not pushed: {}", error)
}

#[async_trait]
impl RemoteStore for PostgrestStore {
    fn name(&self) -> &'static str {
        "postgrest"
    }

    async fn push_assessment(
        &self,
        assessment: &Assessment,
        medications: &[AssessmentMedication],
    ) -> RemoteResult<PushReceipt> {
        let row = RemoteAssessmentRow::from_assessment(assessment);
        let inserted = self.insert(ASSESSMENTS_TABLE, &row).await?;
        let remote_id = extract_inserted_id(&inserted).ok_or(RemoteError::MissingId)?;
        let mut receipt = PushReceipt::complete(remote_id);

        if !medications.is_empty() {
            let rows: Vec<RemoteMedicationRow> = medications
                .iter()
                .map(|m| RemoteMedicationRow::from_medication(&receipt.remote_id, m))
                .collect();
            // The assessment row already exists remotely; a retry would duplicate it.
            if let Err(e) = self.insert(MEDICATIONS_TABLE, &rows).await {
                tracing::warn!(
                    assessment_id = assessment.id,
                    remote_id = %receipt.remote_id,
                    error = %e,
                    "medications were not pushed to the remote store"
                );
                receipt.warning = Some(medications_not_pushed(&e));
            }
        }

        tracing::info!(assessment_id = assessment.id, remote_id = %receipt.remote_id, "assessment pushed");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_inserted_id() {
        assert_eq!(
            extract_inserted_id(&json!([{"id": "5b7c", "age": 70}])),
            Some("5b7c".to_string())
        );
        assert_eq!(extract_inserted_id(&json!({"id": 12})), Some("12".to_string()));
        assert_eq!(extract_inserted_id(&json!([])), None);
        assert_eq!(extract_inserted_id(&json!([{"age": 70}])), None);
    }

    #[test]
    fn test_medications_warning_names_the_cause() {
        let error = RemoteError::Rejected {
            status: 409,
            body: "duplicate key".to_string(),
        };
        let warning = medications_not_pushed(&error);
        assert!(warning.starts_with("medications not pushed:"));
        assert!(warning.contains("409"));
    }

    #[test]
    fn test_table_url_trims_trailing_slash() {
        let store =
            PostgrestStore::new("https://db.example.org/", "key", Duration::from_secs(5)).unwrap();
        assert_eq!(
            store.table_url(ASSESSMENTS_TABLE),
            "https://db.example.org/rest/v1/sarcopeniaAssessments"
        );
    }

    #[test]
    fn test_headers_carry_key_twice() {
        let store =
            PostgrestStore::new("https://db.example.org", "anon-key", Duration::from_secs(5))
                .unwrap();
        let headers = store.headers();
        assert_eq!(headers.get("apikey").unwrap(), "anon-key");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer anon-key");
        assert_eq!(headers.get("Prefer").unwrap(), "return=representation");
    }
}
