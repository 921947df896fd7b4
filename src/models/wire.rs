//! Diagnosis payloads as the backend sends them.
//!
//! The same concept arrives in several shapes depending on which endpoint
//! and which backend revision produced the record:
//!
//! - `cattle`: nested object or bare id
//! - `top_prediction`: `{disease, score}` object or bare label
//! - `predictions`: list of `{disease, score}` or a `disease -> score` map
//! - `submitted_by` / `reviewed_by`: user id, username, or nested user
//! - `_ml`: present only on create responses
//! - scores: numbers, or numeric strings once a vet override has been
//!   stored through the review endpoint

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

use super::cattle::CattleRecord;
use super::{deserialize_null_default, deserialize_nullable_string};

#[derive(Debug, Clone, Deserialize)]
pub struct WireDiagnosis {
    pub id: u64,
    #[serde(default)]
    pub cattle: Option<WireCattleRef>,
    #[serde(default)]
    pub cattle_id: Option<u64>,
    #[serde(default)]
    pub predictions: Option<WirePredictions>,
    #[serde(default)]
    pub top_prediction: Option<WireTopPrediction>,
    #[serde(default, deserialize_with = "deserialize_lenient_score")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub recommendation: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub symptom_text: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub submitted_by: Option<WireUserRef>,
    #[serde(default)]
    pub reviewed_by: Option<WireUserRef>,
    #[serde(default)]
    pub reviewed_at: Option<String>,
    #[serde(default)]
    pub review_status: Option<String>,
    #[serde(default)]
    pub review_notes: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub images: Vec<WireMedia>,
    #[serde(default, rename = "_ml")]
    pub ml: Option<WireMl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireCattleRef {
    Embedded(CattleRecord),
    Id(u64),
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePrediction {
    #[serde(alias = "label")]
    pub disease: String,
    #[serde(default, alias = "confidence", deserialize_with = "deserialize_lenient_score")]
    pub score: Option<f64>,
}

/// A score as a number or as numeric text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireScore {
    Number(f64),
    Text(String),
}

impl WireScore {
    /// Text that does not parse as a finite number yields None.
    pub fn value(&self) -> Option<f64> {
        match self {
            WireScore::Number(n) => Some(*n),
            WireScore::Text(raw) => raw.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

/// Helper to deserialize an optional score given as a number or a string.
pub(crate) fn deserialize_lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<WireScore>::deserialize(deserializer)?.and_then(|s| s.value()))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireTopPrediction {
    Object(WirePrediction),
    Label(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WirePredictions {
    List(Vec<WirePrediction>),
    Map(BTreeMap<String, Option<WireScore>>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireUser {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireUserRef {
    Id(u64),
    Name(String),
    Nested(WireUser),
}

impl WireUserRef {
    /// Username when known, otherwise the id as text.
    pub fn into_label(self) -> Option<String> {
        match self {
            WireUserRef::Id(id) => Some(id.to_string()),
            WireUserRef::Name(name) if name.trim().is_empty() => None,
            WireUserRef::Name(name) => Some(name),
            WireUserRef::Nested(user) => user
                .username
                .filter(|u| !u.trim().is_empty())
                .or_else(|| user.id.map(|id| id.to_string())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMedia {
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub file: String,
    #[serde(default)]
    pub gradcam_url: Option<String>,
}

/// Post-processed model output attached to create responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireMl {
    #[serde(default)]
    pub top_processed: Option<WirePrediction>,
    #[serde(default, deserialize_with = "deserialize_lenient_score")]
    pub confidence_processed: Option<f64>,
    #[serde(default)]
    pub uncertain: Option<bool>,
    #[serde(default)]
    pub model_version: Option<String>,
}
