//! Canonical diagnosis record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cattle::CattleRecord;
use super::parse_timestamp;
use super::wire::{
    WireCattleRef, WireDiagnosis, WirePrediction, WirePredictions, WireScore, WireTopPrediction,
};
use crate::error::ValidationError;

/// Display name used when a record references no cattle at all.
pub const UNKNOWN_CATTLE: &str = "Unknown";

/// Display disease used when a record carries no prediction.
pub const NO_PREDICTION: &str = "No prediction";

// ============================================================================
// Severity
// ============================================================================

/// Urgency tag assigned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl Severity {
    /// Case-insensitive parse; null, empty and unrecognised values are `Unknown`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("low") => Severity::Low,
            Some("medium") => Severity::Medium,
            Some("high") => Severity::High,
            _ => Severity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Unknown => "unknown",
        }
    }

    pub const ALL: [Severity; 4] = [Severity::High, Severity::Medium, Severity::Low, Severity::Unknown];
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Review
// ============================================================================

/// Veterinarian disposition on a diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Edited,
    Rejected,
}

impl ReviewStatus {
    /// Missing or unrecognised statuses read as `Pending`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("approved") => ReviewStatus::Approved,
            Some("edited") => ReviewStatus::Edited,
            Some("rejected") => ReviewStatus::Rejected,
            _ => ReviewStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Edited => "edited",
            ReviewStatus::Rejected => "rejected",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ReviewStatus::Pending)
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReviewStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approved" | "approve" => Ok(ReviewStatus::Approved),
            "edited" | "edit" => Ok(ReviewStatus::Edited),
            "rejected" | "reject" => Ok(ReviewStatus::Rejected),
            other => Err(ValidationError::UnknownValue {
                kind: "review status",
                value: other.to_string(),
            }),
        }
    }
}

/// Review metadata attached to a diagnosis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewInfo {
    pub status: ReviewStatus,
    pub reviewer: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Body of `POST /api/diagnosis/{id}/review/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewPayload {
    pub review_status: ReviewStatus,
    pub review_notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_prediction: Option<TopPredictionOverride>,
}

/// Corrected top prediction sent with an `edited` review.
///
/// The backend stores it as a string map, so only the disease is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopPredictionOverride {
    pub disease: String,
}

// ============================================================================
// Record
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub disease: String,
    pub score: f64,
}

impl From<WirePrediction> for Prediction {
    fn from(wire: WirePrediction) -> Self {
        Self {
            disease: wire.disease,
            score: wire.score.unwrap_or(0.0),
        }
    }
}

/// Cattle a diagnosis refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum CattleRef {
    Embedded(CattleRecord),
    Id(u64),
}

impl CattleRef {
    pub fn id(&self) -> u64 {
        match self {
            CattleRef::Embedded(record) => record.id,
            CattleRef::Id(id) => *id,
        }
    }
}

/// An uploaded image, possibly with a Grad-CAM overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisImage {
    pub file: String,
    pub gradcam_url: Option<String>,
}

/// A diagnosis in its single canonical shape.
///
/// Deserializes from any of the backend's payload shapes; `display_name`
/// and `display_disease` are fixed at that point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "WireDiagnosis")]
pub struct DiagnosisRecord {
    pub id: u64,
    pub cattle: Option<CattleRef>,
    /// Ranked candidates, best first when the backend sent a map.
    pub predictions: Vec<Prediction>,
    pub top_prediction: Option<Prediction>,
    /// Disease chosen by post-processing, when the backend supplied one.
    pub processed_disease: Option<String>,
    pub confidence: Option<f64>,
    pub severity: Severity,
    pub recommendation: String,
    pub symptom_text: String,
    pub created_at: Option<DateTime<Utc>>,
    /// Case workflow status (pending, completed, under_treatment, ...).
    pub status: Option<String>,
    pub submitted_by: Option<String>,
    pub review: ReviewInfo,
    pub images: Vec<DiagnosisImage>,
    /// Model confidence fell under the backend's threshold.
    pub uncertain: bool,
    /// Inference model that produced the result, from create responses.
    pub model_version: Option<String>,
    pub display_name: String,
    pub display_disease: String,
}

impl From<WireDiagnosis> for DiagnosisRecord {
    fn from(wire: WireDiagnosis) -> Self {
        let cattle = match (wire.cattle, wire.cattle_id) {
            (Some(WireCattleRef::Embedded(record)), _) => Some(CattleRef::Embedded(record)),
            (Some(WireCattleRef::Id(id)), _) | (None, Some(id)) => Some(CattleRef::Id(id)),
            (None, None) => None,
        };

        let predictions: Vec<Prediction> = match wire.predictions {
            Some(WirePredictions::List(list)) => list.into_iter().map(Prediction::from).collect(),
            Some(WirePredictions::Map(map)) => {
                let mut ranked: Vec<Prediction> = map
                    .into_iter()
                    .map(|(disease, score)| Prediction {
                        disease,
                        score: score.as_ref().and_then(WireScore::value).unwrap_or(0.0),
                    })
                    .collect();
                ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
                ranked
            }
            None => Vec::new(),
        };

        let ml = wire.ml.unwrap_or_default();
        let confidence = wire.confidence.or(ml.confidence_processed);

        let top_prediction = wire.top_prediction.map(|top| match top {
            WireTopPrediction::Object(p) => Prediction::from(p),
            WireTopPrediction::Label(disease) => {
                let score = predictions
                    .iter()
                    .find(|p| p.disease == disease)
                    .map(|p| p.score)
                    .or(confidence)
                    .unwrap_or(0.0);
                Prediction { disease, score }
            }
        });

        let processed_disease = ml
            .top_processed
            .map(|p| p.disease)
            .filter(|d| !d.trim().is_empty());

        let review = ReviewInfo {
            status: ReviewStatus::parse(wire.review_status.as_deref()),
            reviewer: wire.reviewed_by.and_then(|r| r.into_label()),
            reviewed_at: wire.reviewed_at.as_deref().and_then(parse_timestamp),
            notes: wire.review_notes.filter(|n| !n.trim().is_empty()),
        };

        let images = wire
            .images
            .into_iter()
            .map(|m| DiagnosisImage {
                file: m.file,
                gradcam_url: m.gradcam_url.filter(|u| !u.trim().is_empty()),
            })
            .collect();

        let mut record = Self {
            id: wire.id,
            cattle,
            predictions,
            top_prediction,
            processed_disease,
            confidence,
            severity: Severity::parse(wire.severity.as_deref()),
            recommendation: wire.recommendation,
            symptom_text: wire.symptom_text,
            created_at: wire.created_at.as_deref().and_then(parse_timestamp),
            status: wire.status.filter(|s| !s.trim().is_empty()),
            submitted_by: wire.submitted_by.and_then(|s| s.into_label()),
            review,
            images,
            uncertain: ml.uncertain.unwrap_or(false),
            model_version: ml.model_version.filter(|v| !v.trim().is_empty()),
            display_name: String::new(),
            display_disease: String::new(),
        };
        record.display_name = record.resolve_display_name();
        record.display_disease = record.resolve_display_disease();
        record
    }
}

impl DiagnosisRecord {
    fn resolve_display_name(&self) -> String {
        match &self.cattle {
            Some(CattleRef::Embedded(cattle)) => cattle.display_name(),
            Some(CattleRef::Id(id)) => format!("Cattle #{}", id),
            None => UNKNOWN_CATTLE.to_string(),
        }
    }

    fn resolve_display_disease(&self) -> String {
        let candidates = [
            self.processed_disease.as_deref(),
            self.top_prediction.as_ref().map(|p| p.disease.as_str()),
            self.predictions.first().map(|p| p.disease.as_str()),
        ];
        candidates
            .into_iter()
            .flatten()
            .find(|d| !d.trim().is_empty())
            .unwrap_or(NO_PREDICTION)
            .to_string()
    }

    pub fn cattle_id(&self) -> Option<u64> {
        self.cattle.as_ref().map(CattleRef::id)
    }

    /// Confidence as a percentage with one decimal, e.g. `87.5%`.
    pub fn confidence_percent(&self) -> Option<String> {
        self.confidence.map(|c| format!("{:.1}%", c * 100.0))
    }

    /// Grad-CAM overlay URLs attached to this diagnosis.
    pub fn gradcam_urls(&self) -> impl Iterator<Item = &str> {
        self.images.iter().filter_map(|i| i.gradcam_url.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> DiagnosisRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_payload() {
        let r = record(json!({
            "id": 10,
            "cattle": { "id": 3, "tag_number": "T3", "name": "Bossy" },
            "submitted_by": 4,
            "symptom_text": "nodules on skin",
            "images": [{ "id": 1, "file": "/media/images/a.jpg", "gradcam_url": "http://ml/gc.png" }],
            "predictions": [{ "disease": "lumpy", "score": 0.82 }, { "disease": "healthy", "score": 0.18 }],
            "top_prediction": { "disease": "lumpy", "score": 0.82 },
            "confidence": 0.82,
            "severity": "High",
            "recommendation": "Isolate the animal.",
            "created_at": "2024-04-01T08:00:00Z",
            "status": "completed",
            "reviewed_by": null,
            "reviewed_at": null,
            "review_status": "pending",
            "review_notes": null
        }));

        assert_eq!(r.display_name, "Bossy");
        assert_eq!(r.display_disease, "lumpy");
        assert_eq!(r.severity, Severity::High);
        assert_eq!(r.cattle_id(), Some(3));
        assert_eq!(r.submitted_by.as_deref(), Some("4"));
        assert_eq!(r.review.status, ReviewStatus::Pending);
        assert_eq!(r.confidence_percent().as_deref(), Some("82.0%"));
        assert_eq!(r.gradcam_urls().collect::<Vec<_>>(), vec!["http://ml/gc.png"]);
        assert!(r.created_at.is_some());
    }

    #[test]
    fn test_display_name_fallback_chain() {
        assert_eq!(record(json!({ "id": 1, "cattle": { "id": 2, "tag_number": "TAG-2" } })).display_name, "TAG-2");
        assert_eq!(record(json!({ "id": 1, "cattle": 9 })).display_name, "Cattle #9");
        assert_eq!(record(json!({ "id": 1, "cattle_id": 5 })).display_name, "Cattle #5");
        assert_eq!(record(json!({ "id": 1 })).display_name, "Unknown");
    }

    #[test]
    fn test_display_disease_fallback_chain() {
        let processed = record(json!({
            "id": 1,
            "top_prediction": "fmd",
            "_ml": {
                "top_processed": { "disease": "lumpy", "score": 0.7 },
                "uncertain": true,
                "model_version": "effnet-b0-v3"
            }
        }));
        assert_eq!(processed.display_disease, "lumpy");
        assert!(processed.uncertain);
        assert_eq!(processed.model_version.as_deref(), Some("effnet-b0-v3"));

        assert_eq!(record(json!({ "id": 1, "top_prediction": "fmd" })).display_disease, "fmd");
        assert_eq!(
            record(json!({ "id": 1, "predictions": [{ "disease": "mastitis", "score": 0.4 }] })).display_disease,
            "mastitis"
        );
        assert_eq!(record(json!({ "id": 1 })).display_disease, "No prediction");
    }

    #[test]
    fn test_prediction_map_is_ranked() {
        let r = record(json!({ "id": 1, "predictions": { "a": 0.1, "b": 0.7, "c": 0.2 } }));
        let order: Vec<&str> = r.predictions.iter().map(|p| p.disease.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert_eq!(r.display_disease, "b");
    }

    #[test]
    fn test_label_top_prediction_takes_score_from_predictions() {
        let r = record(json!({
            "id": 1,
            "top_prediction": "b",
            "predictions": { "a": 0.3, "b": 0.6 },
            "confidence": 0.9
        }));
        assert_eq!(r.top_prediction, Some(Prediction { disease: "b".to_string(), score: 0.6 }));
    }

    #[test]
    fn test_severity_null_and_mixed_case() {
        assert_eq!(record(json!({ "id": 1, "severity": null })).severity, Severity::Unknown);
        assert_eq!(record(json!({ "id": 1, "severity": "MeDiUm" })).severity, Severity::Medium);
        assert_eq!(record(json!({ "id": 1, "severity": "critical" })).severity, Severity::Unknown);
    }

    #[test]
    fn test_review_metadata() {
        let r = record(json!({
            "id": 1,
            "review_status": "Edited",
            "reviewed_by": { "id": 2, "username": "dr_kim" },
            "reviewed_at": "2024-04-02T09:00:00Z",
            "review_notes": "Adjusted dosage"
        }));
        assert_eq!(r.review.status, ReviewStatus::Edited);
        assert_eq!(r.review.reviewer.as_deref(), Some("dr_kim"));
        assert!(r.review.reviewed_at.is_some());
        assert_eq!(r.review.notes.as_deref(), Some("Adjusted dosage"));
    }

    #[test]
    fn test_confidence_falls_back_to_processed() {
        let r = record(json!({ "id": 1, "_ml": { "confidence_processed": 0.455 } }));
        assert_eq!(r.confidence, Some(0.455));
        assert_eq!(record(json!({ "id": 1 })).confidence_percent(), None);
    }

    #[test]
    fn test_unparseable_timestamp_is_none() {
        assert!(record(json!({ "id": 1, "created_at": "soon" })).created_at.is_none());
    }

    #[test]
    fn test_review_status_from_str() {
        assert_eq!("approve".parse::<ReviewStatus>().unwrap(), ReviewStatus::Approved);
        assert!("pending".parse::<ReviewStatus>().is_err());
    }

    #[test]
    fn test_review_payload_serialization() {
        let payload = ReviewPayload {
            review_status: ReviewStatus::Rejected,
            review_notes: "Image unclear".to_string(),
            recommendation: None,
            top_prediction: None,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "review_status": "rejected", "review_notes": "Image unclear" })
        );

        let edited = ReviewPayload {
            review_status: ReviewStatus::Edited,
            review_notes: "n".to_string(),
            recommendation: Some("Isolate".to_string()),
            top_prediction: Some(TopPredictionOverride {
                disease: "Mastitis".to_string(),
            }),
        };
        assert_eq!(
            serde_json::to_value(&edited).unwrap(),
            json!({
                "review_status": "edited",
                "review_notes": "n",
                "recommendation": "Isolate",
                "top_prediction": { "disease": "Mastitis" }
            })
        );
    }

    #[test]
    fn test_stored_override_with_string_score() {
        let r = record(json!({
            "id": 2,
            "top_prediction": { "disease": "fmd", "score": "0.8" },
            "confidence": "0.8"
        }));
        assert_eq!(r.top_prediction, Some(Prediction { disease: "fmd".to_string(), score: 0.8 }));
        assert_eq!(r.confidence, Some(0.8));
        assert_eq!(r.display_disease, "fmd");
    }
}
