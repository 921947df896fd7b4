//! Session lifecycle across bootstrap, login, review and logout.

mod common;

use serde_json::json;

use common::{expired_credentials, mock_api, test_credentials, MOCK_BASE};
use herdview::adapters::MockResponse;
use herdview::domain::Session;
use herdview::error::{AuthError, HerdError};
use herdview::models::{LoginRequest, ReviewStatus};
use herdview::notifications::{NoticeLevel, Notifications};
use herdview::view_state::{DiagnosisHistory, ReviewForm};

fn url(path: &str) -> String {
    format!("{}{}", MOCK_BASE, path)
}

#[tokio::test]
async fn test_cold_start_without_token_is_signed_out() {
    let (api, http, _store) = mock_api(None);
    let mut session = Session::new(api);
    assert!(session.is_loading());

    assert!(session.bootstrap().await.is_none());

    assert!(!session.is_loading());
    assert!(!session.is_authenticated());
    assert!(http.get_requests().is_empty());
}

#[tokio::test]
async fn test_expired_token_refreshes_before_profile() {
    let (api, http, store) = mock_api(Some(expired_credentials()));
    http.set_response(
        &url("/api/auth/token/refresh/"),
        MockResponse::json(200, json!({ "access": "fresh-token" })),
    );
    http.set_response(
        &url("/api/auth/me/"),
        MockResponse::json(200, json!({ "id": 2, "username": "tester", "role": "admin" })),
    );

    let mut session = Session::new(api);
    let user = session.bootstrap().await.cloned().unwrap();

    assert_eq!(user.username, "tester");
    assert_eq!(store.access_token().as_deref(), Some("fresh-token"));
    let me = http
        .get_requests()
        .into_iter()
        .find(|r| r.url.ends_with("/api/auth/me/"))
        .unwrap();
    assert_eq!(me.authorization(), Some("Bearer fresh-token"));
}

#[tokio::test]
async fn test_revoked_token_signs_out() {
    let (api, http, store) = mock_api(Some(test_credentials()));
    http.set_response(&url("/api/auth/me/"), MockResponse::status(401, ""));

    let mut session = Session::new(api);
    assert!(session.bootstrap().await.is_none());

    assert!(store.get_credentials().is_none());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_login_review_logout() {
    let (api, http, store) = mock_api(None);
    http.set_response(
        &url("/api/auth/login/"),
        MockResponse::json(200, json!({ "access": "vet-token", "refresh": "vet-refresh" })),
    );
    http.set_response(
        &url("/api/auth/me/"),
        MockResponse::json(200, json!({ "id": 3, "username": "dr_vet", "role": "vet" })),
    );
    http.set_response(
        &url("/api/diagnosis/"),
        MockResponse::json(200, json!([{ "id": 21, "severity": "medium", "top_prediction": "Foot Rot" }])),
    );
    http.set_response(
        &url("/api/diagnosis/21/review/"),
        MockResponse::json(
            200,
            json!({ "id": 21, "severity": "medium", "top_prediction": "Foot Rot",
                    "review_status": "rejected", "reviewed_by": "dr_vet" }),
        ),
    );

    let mut session = Session::new(api);
    session.bootstrap().await;
    session
        .login(&LoginRequest {
            username: "dr_vet".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert!(session.can_review());

    let mut history = DiagnosisHistory::new();
    assert!(history.load(session.api(), None).await);

    let mut notices = Notifications::new();
    let mut form = ReviewForm::new(ReviewStatus::Rejected);
    form.notes = "Image too blurry".to_string();
    form.submit(&session, 21, &mut history, &mut notices).await.unwrap();

    assert_eq!(history.get(21).unwrap().review.status, ReviewStatus::Rejected);
    assert_eq!(notices.drain()[0].level, NoticeLevel::Success);
    let review = http
        .requests_with_method("POST")
        .into_iter()
        .find(|r| r.url.ends_with("/review/"))
        .unwrap();
    assert_eq!(review.authorization(), Some("Bearer vet-token"));
    assert_eq!(review.json_body().unwrap()["review_notes"], "Image too blurry");

    session.logout().await;
    assert!(!session.is_authenticated());
    assert!(store.get_credentials().is_none());
}

#[tokio::test]
async fn test_review_requires_sign_in() {
    let (api, http, _store) = mock_api(None);
    let mut session = Session::new(api);
    session.bootstrap().await;

    let mut history = DiagnosisHistory::new();
    let mut notices = Notifications::new();
    let err = ReviewForm::new(ReviewStatus::Approved)
        .submit(&session, 1, &mut history, &mut notices)
        .await
        .unwrap_err();

    assert!(matches!(err, HerdError::Auth(AuthError::NotAuthenticated)));
    assert!(http.get_requests().is_empty());
    assert_eq!(notices.len(), 1);
}
