//! Cattle endpoints.

use serde_json::Value;

use super::client::ApiClient;
use super::{ListEnvelope, CATTLE_PATH};
use crate::error::{ErrorContext, HerdResult, ResultExt};
use crate::models::{CattleDraft, CattleRecord};

fn cattle_item_path(id: u64) -> String {
    format!("{}{}/", CATTLE_PATH, id)
}

impl ApiClient {
    /// `GET /api/cattle/`
    pub async fn list_cattle(&self) -> HerdResult<Vec<CattleRecord>> {
        let list: ListEnvelope<Value> = self.get(CATTLE_PATH).await?;
        Ok(list.decode_each("cattle"))
    }

    /// `POST /api/cattle/`
    pub async fn create_cattle(&self, draft: &CattleDraft) -> HerdResult<CattleRecord> {
        draft.validate()?;
        self.post(CATTLE_PATH, draft)
            .await
            .context(ErrorContext::new("create_cattle").with_resource_id(&draft.tag_number))
    }

    /// `PUT /api/cattle/{id}/`
    pub async fn update_cattle(&self, id: u64, draft: &CattleDraft) -> HerdResult<CattleRecord> {
        draft.validate()?;
        self.put(&cattle_item_path(id), draft)
            .await
            .context(ErrorContext::new("update_cattle").with_resource_id(id))
    }

    /// `DELETE /api/cattle/{id}/`
    pub async fn delete_cattle(&self, id: u64) -> HerdResult<()> {
        self.delete(&cattle_item_path(id))
            .await
            .context(ErrorContext::new("delete_cattle").with_resource_id(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryCredentials, MockHttpClient, MockResponse};
    use crate::error::HerdError;
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (ApiClient, MockHttpClient) {
        let http = MockHttpClient::new();
        let api = ApiClient::new(
            "http://test",
            Arc::new(http.clone()),
            Arc::new(InMemoryCredentials::with_token("t")),
        );
        (api, http)
    }

    #[tokio::test]
    async fn test_list_cattle() {
        let (api, http) = setup();
        http.set_response(
            "http://test/api/cattle/",
            MockResponse::json(200, json!([{ "id": 1, "tag_number": "T1" }, { "id": 2, "tag_number": "T2" }])),
        );

        let herd = api.list_cattle().await.unwrap();
        assert_eq!(herd.len(), 2);
        assert_eq!(herd[1].tag_number, "T2");
    }

    #[tokio::test]
    async fn test_update_uses_item_path() {
        let (api, http) = setup();
        http.set_response(
            "http://test/api/cattle/4/",
            MockResponse::json(200, json!({ "id": 4, "tag_number": "T4", "name": "Daisy" })),
        );

        let draft = CattleDraft {
            tag_number: "T4".to_string(),
            name: "Daisy".to_string(),
            ..Default::default()
        };
        let updated = api.update_cattle(4, &draft).await.unwrap();

        assert_eq!(updated.name, "Daisy");
        assert_eq!(http.get_requests()[0].method, "PUT");
    }

    #[tokio::test]
    async fn test_create_invalid_draft_sends_nothing() {
        let (api, http) = setup();
        let err = api.create_cattle(&CattleDraft::default()).await.unwrap_err();
        assert!(matches!(err, HerdError::Validation(_)));
        assert!(http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure_carries_context() {
        let (api, http) = setup();
        http.set_response("http://test/api/cattle/9/", MockResponse::status(404, ""));

        let err = api.delete_cattle(9).await.unwrap_err();
        let ctx = err.context().unwrap();
        assert_eq!(ctx.operation, "delete_cattle");
        assert_eq!(ctx.resource_id.as_deref(), Some("9"));
        assert_eq!(err.http_status(), Some(404));
    }
}
