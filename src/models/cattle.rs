//! Cattle records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{deserialize_lenient_date, deserialize_nullable_string};
use crate::error::ValidationError;

/// A head of cattle as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CattleRecord {
    pub id: u64,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub tag_number: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub breed: String,
    #[serde(default)]
    pub age_years: Option<u32>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub last_checkup: Option<NaiveDate>,
    /// Owning user id. Read-only on the backend.
    #[serde(default)]
    pub owner: Option<u64>,
}

impl CattleRecord {
    /// Name for display: name, then tag number, then `Cattle #<id>`.
    pub fn display_name(&self) -> String {
        if !self.name.trim().is_empty() {
            self.name.clone()
        } else if !self.tag_number.trim().is_empty() {
            self.tag_number.clone()
        } else {
            format!("Cattle #{}", self.id)
        }
    }

    /// Case-insensitive match of tag number, name or breed against `query`.
    ///
    /// An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&self.tag_number, &self.name, &self.breed]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Create/update payload for a head of cattle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CattleDraft {
    pub tag_number: String,
    pub name: String,
    pub breed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_years: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checkup: Option<NaiveDate>,
}

impl CattleDraft {
    /// Check local constraints before anything is sent.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tag_number.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "tag_number" });
        }
        if let Some(weight) = self.weight_kg {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ValidationError::InvalidField {
                    field: "weight_kg",
                    message: "must be a non-negative number".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Draft pre-filled from an existing record, for edits.
    pub fn from_record(record: &CattleRecord) -> Self {
        Self {
            tag_number: record.tag_number.clone(),
            name: record.name.clone(),
            breed: record.breed.clone(),
            age_years: record.age_years,
            weight_kg: record.weight_kg,
            last_checkup: record.last_checkup,
        }
    }
}
