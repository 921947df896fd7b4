//! Common test utilities for integration tests.
//!
//! Fixtures for credentials, diagnosis payloads, and API clients wired to
//! either the in-memory mocks or a wiremock server.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};

use herdview::adapters::{InMemoryCredentials, MockHttpClient, ReqwestHttpClient};
use herdview::api::ApiClient;
use herdview::auth::credentials::Credentials;
use herdview::models::DiagnosisRecord;

/// Base URL used with [`MockHttpClient`].
pub const MOCK_BASE: &str = "http://test";

/// Credentials that won't expire during test execution.
pub fn test_credentials() -> Credentials {
    Credentials {
        access_token: Some("test-access-token-12345".to_string()),
        refresh_token: Some("test-refresh-token-67890".to_string()),
        expires_at: Some(i64::MAX),
        username: Some("tester".to_string()),
    }
}

/// Already expired credentials, for refresh flows.
pub fn expired_credentials() -> Credentials {
    Credentials {
        access_token: Some("expired-access-token".to_string()),
        refresh_token: Some("test-refresh-token".to_string()),
        expires_at: Some(0),
        username: Some("tester".to_string()),
    }
}

/// Client over the in-memory mocks, returning handles to both.
pub fn mock_api(creds: Option<Credentials>) -> (ApiClient, MockHttpClient, InMemoryCredentials) {
    let http = MockHttpClient::new();
    let store = match creds {
        Some(creds) => InMemoryCredentials::with_credentials(creds),
        None => InMemoryCredentials::new(),
    };
    let api = ApiClient::new(MOCK_BASE, Arc::new(http.clone()), Arc::new(store.clone()));
    (api, http, store)
}

/// Client over real reqwest transport pointed at `base_url`.
pub fn reqwest_api(base_url: &str, creds: Option<Credentials>) -> (ApiClient, InMemoryCredentials) {
    let store = match creds {
        Some(creds) => InMemoryCredentials::with_credentials(creds),
        None => InMemoryCredentials::new(),
    };
    let api = ApiClient::new(
        base_url,
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(store.clone()),
    );
    (api, store)
}

/// Diagnosis JSON in the flat list shape the backend returns.
pub fn diagnosis_json(id: u64, name: &str, disease: &str, severity: &str, confidence: Option<f64>, day: u32) -> Value {
    json!({
        "id": id,
        "cattle": { "id": id * 10, "tag_number": format!("T-{}", id), "name": name },
        "top_prediction": disease,
        "confidence": confidence,
        "severity": severity,
        "created_at": format!("2024-03-{:02}T08:00:00Z", day),
    })
}

pub fn diagnosis(id: u64, name: &str, disease: &str, severity: &str, confidence: Option<f64>, day: u32) -> DiagnosisRecord {
    serde_json::from_value(diagnosis_json(id, name, disease, severity, confidence, day))
        .expect("fixture should deserialize")
}

/// Small herd of diagnoses covering every severity.
pub fn sample_diagnoses() -> Vec<DiagnosisRecord> {
    vec![
        diagnosis(1, "Bossy", "Mastitis", "high", Some(0.91), 1),
        diagnosis(2, "Daisy", "Lumpy Skin", "medium", Some(0.64), 2),
        diagnosis(3, "Bella", "Foot Rot", "low", Some(0.42), 3),
        diagnosis(4, "Bossy", "Foot Rot", "medium", None, 4),
        diagnosis(5, "Rosie", "Mastitis", "high", Some(0.77), 5),
    ]
}
