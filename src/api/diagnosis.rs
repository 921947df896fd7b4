//! Diagnosis endpoints.

use serde_json::Value;

use super::client::ApiClient;
use super::{ListEnvelope, DIAGNOSIS_PATH};
use crate::error::{ErrorContext, HerdResult, ResultExt};
use crate::models::{DiagnosisRecord, ReviewPayload};

impl ApiClient {
    /// `GET /api/diagnosis/`, optionally narrowed to one animal.
    pub async fn list_diagnoses(&self, cattle_id: Option<u64>) -> HerdResult<Vec<DiagnosisRecord>> {
        let path = match cattle_id {
            Some(id) => format!("{}?cattle_id={}", DIAGNOSIS_PATH, id),
            None => DIAGNOSIS_PATH.to_string(),
        };
        let list: ListEnvelope<Value> = self.get(&path).await?;
        Ok(list.decode_each("diagnosis"))
    }

    /// `GET /api/diagnosis/{id}/`
    pub async fn get_diagnosis(&self, id: u64) -> HerdResult<DiagnosisRecord> {
        self.get(&format!("{}{}/", DIAGNOSIS_PATH, id))
            .await
            .context(ErrorContext::new("get_diagnosis").with_resource_id(id))
    }

    /// `POST /api/diagnosis/{id}/review/`, returning the updated record.
    pub async fn review_diagnosis(&self, id: u64, payload: &ReviewPayload) -> HerdResult<DiagnosisRecord> {
        self.post(&format!("{}{}/review/", DIAGNOSIS_PATH, id), payload)
            .await
            .context(ErrorContext::new("review_diagnosis").with_resource_id(id))
    }
}
