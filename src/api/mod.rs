//! Typed client for the farm backend REST API.
//!
//! [`ApiClient`] attaches the bearer token, turns non-2xx responses into
//! [`NetworkError::HttpStatus`], and decodes JSON bodies. The auth, cattle
//! and diagnosis endpoints live in the submodules as further `impl` blocks.

mod auth;
mod cattle;
mod client;
mod diagnosis;

pub use auth::RegisterOutcome;
pub use client::{ApiClient, Method};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

pub const LOGIN_PATH: &str = "/api/auth/login/";
pub const REGISTER_PATH: &str = "/api/auth/register/";
pub const ME_PATH: &str = "/api/auth/me/";
pub const TOKEN_REFRESH_PATH: &str = "/api/auth/token/refresh/";
pub const CATTLE_PATH: &str = "/api/cattle/";
pub const DIAGNOSIS_PATH: &str = "/api/diagnosis/";

/// Collection body: a bare array, or a paginated `{results: [...]}` page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Plain(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> ListEnvelope<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Plain(items) | ListEnvelope::Paged { results: items } => items,
        }
    }
}

impl ListEnvelope<Value> {
    /// Decode each item on its own. Items that fail are logged and skipped.
    pub(crate) fn decode_each<T: DeserializeOwned>(self, kind: &str) -> Vec<T> {
        self.into_vec()
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    tracing::warn!(kind, index, "Skipping malformed list item: {}", e);
                    None
                }
            })
            .collect()
    }
}
