//! Transport-facing half of the API client.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::adapters::{FileCredentialsProvider, ReqwestHttpClient};
use crate::config::ClientConfig;
use crate::error::{body_excerpt, HerdResult, NetworkError, SystemError};
use crate::traits::{CredentialsProvider, Headers, HttpClient, Response};

/// HTTP verbs the backend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Client for the farm backend.
///
/// Cheap to clone; clones share the transport and token store.
///
/// # Example
///
/// ```ignore
/// use herdview::api::ApiClient;
/// use herdview::config::ClientConfig;
///
/// let api = ApiClient::from_config(&ClientConfig::from_env()?)?;
/// let herd = api.list_cattle().await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
    credentials: Arc<dyn CredentialsProvider>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client over explicit transport and token store.
    pub fn new(
        base_url: impl Into<String>,
        http: Arc<dyn HttpClient>,
        credentials: Arc<dyn CredentialsProvider>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            credentials,
        }
    }

    /// Production client: reqwest transport with the configured timeout,
    /// tokens in the configured credentials file.
    pub fn from_config(config: &ClientConfig) -> HerdResult<Self> {
        let http = ReqwestHttpClient::with_timeout(config.request_timeout)
            .map_err(|e| NetworkError::from_transport(e, &config.base_url))?;
        let path = config
            .resolved_credentials_path()
            .ok_or(SystemError::NoHomeDirectory)?;
        let credentials = FileCredentialsProvider::with_path(path);

        Ok(Self::new(
            config.base_url.clone(),
            Arc::new(http),
            Arc::new(credentials),
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token store the client reads from.
    pub fn credentials(&self) -> &Arc<dyn CredentialsProvider> {
        &self.credentials
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Current access token, read fresh from the store.
    ///
    /// A store that fails to load is treated as holding no token.
    pub async fn access_token(&self) -> Option<String> {
        match self.credentials.load().await {
            Ok(creds) => creds.and_then(|c| c.access_token),
            Err(e) => {
                tracing::warn!("Could not read stored credentials: {}", e);
                None
            }
        }
    }

    async fn headers(&self, with_body: bool) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        if with_body {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }
        if let Some(token) = self.access_token().await {
            headers.insert("Authorization".to_string(), format!("Bearer {}", token));
        }
        headers
    }

    /// Send a request and return the raw response if it was 2xx.
    pub async fn send(&self, method: Method, path: &str, body: Option<String>) -> HerdResult<Response> {
        let url = self.url(path);
        let headers = self.headers(body.is_some()).await;
        let body = body.unwrap_or_default();

        tracing::debug!(method = method.as_str(), %url, "Sending request");

        let result = match method {
            Method::Get => self.http.get(&url, &headers).await,
            Method::Post => self.http.post(&url, &body, &headers).await,
            Method::Put => self.http.put(&url, &body, &headers).await,
            Method::Delete => self.http.delete(&url, &headers).await,
        };

        let response = result.map_err(|e| {
            tracing::debug!(method = method.as_str(), %url, "Transport error: {}", e);
            NetworkError::from_transport(e, &url)
        })?;

        tracing::debug!(method = method.as_str(), %url, status = response.status, "Response received");

        if !response.is_success() {
            let body = response.text_lossy();
            tracing::debug!(status = response.status, body = body_excerpt(&body), "Request rejected");
            return Err(NetworkError::HttpStatus {
                status: response.status,
                body,
            }
            .into());
        }

        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: &Response) -> HerdResult<T> {
        let text = response.text_lossy();
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| {
            NetworkError::InvalidResponse {
                message: e.to_string(),
            }
            .into()
        })
    }

    fn encode<B: Serialize + ?Sized>(body: &B) -> HerdResult<String> {
        Ok(serde_json::to_string(body)?)
    }

    /// GET `path` and decode the body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> HerdResult<T> {
        let response = self.send(Method::Get, path, None).await?;
        Self::decode(&response)
    }

    /// POST a JSON body to `path` and decode the reply.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> HerdResult<T> {
        let response = self.send(Method::Post, path, Some(Self::encode(body)?)).await?;
        Self::decode(&response)
    }

    /// PUT a JSON body to `path` and decode the reply.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> HerdResult<T> {
        let response = self.send(Method::Put, path, Some(Self::encode(body)?)).await?;
        Self::decode(&response)
    }

    /// DELETE `path`. Any 2xx counts as success.
    pub async fn delete(&self, path: &str) -> HerdResult<()> {
        self.send(Method::Delete, path, None).await?;
        Ok(())
    }
}
