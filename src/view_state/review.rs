//! Veterinarian review of a diagnosis.

use crate::domain::Session;
use crate::error::{HerdError, HerdResult, ValidationError};
use crate::models::{DiagnosisRecord, ReviewPayload, ReviewStatus, TopPredictionOverride};
use crate::notifications::Notifications;

use super::diagnosis_history::DiagnosisHistory;

/// Action name used in access-denied messages.
pub const REVIEW_ACTION: &str = "review diagnoses";

/// Review form contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewForm {
    pub status: Option<ReviewStatus>,
    pub notes: String,
    pub recommendation: String,
    /// Corrected disease label, only meaningful for `Edited`.
    pub corrected_disease: String,
}

impl ReviewForm {
    pub fn new(status: ReviewStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Check the form and build the request body.
    ///
    /// A status is required and cannot be `Pending`. An edit must carry a
    /// recommendation or notes.
    pub fn validate(&self) -> Result<ReviewPayload, ValidationError> {
        let status = match self.status {
            None => return Err(ValidationError::MissingField { field: "review_status" }),
            Some(ReviewStatus::Pending) => {
                return Err(ValidationError::UnknownValue {
                    kind: "review status",
                    value: ReviewStatus::Pending.as_str().to_string(),
                })
            }
            Some(status) => status,
        };

        let notes = self.notes.trim();
        let recommendation = self.recommendation.trim();
        if status == ReviewStatus::Edited && notes.is_empty() && recommendation.is_empty() {
            return Err(ValidationError::MissingField { field: "recommendation" });
        }

        let corrected = self.corrected_disease.trim();
        Ok(ReviewPayload {
            review_status: status,
            review_notes: notes.to_string(),
            recommendation: (!recommendation.is_empty()).then(|| recommendation.to_string()),
            top_prediction: (status == ReviewStatus::Edited && !corrected.is_empty()).then(|| {
                TopPredictionOverride {
                    disease: corrected.to_string(),
                }
            }),
        })
    }

    /// Submit the review for `diagnosis_id`.
    ///
    /// On success the history shows the server's updated record. On any
    /// failure an error notice is raised and the history is untouched.
    pub async fn submit(
        &self,
        session: &Session,
        diagnosis_id: u64,
        history: &mut DiagnosisHistory,
        notices: &mut Notifications,
    ) -> HerdResult<()> {
        let action = format!("Reviewing diagnosis #{}", diagnosis_id);
        match self.send(session, diagnosis_id).await {
            Ok(record) => {
                let status = record.review.status;
                history.replace_record(record);
                notices.success(format!("Diagnosis #{} marked {}", diagnosis_id, status));
                Ok(())
            }
            Err(e) => {
                notices.error(&action, &e);
                Err(e)
            }
        }
    }

    async fn send(&self, session: &Session, diagnosis_id: u64) -> HerdResult<DiagnosisRecord> {
        let payload = self.validate()?;
        session.require_reviewer(REVIEW_ACTION).map_err(HerdError::from)?;
        session.api().review_diagnosis(diagnosis_id, &payload).await
    }
}
