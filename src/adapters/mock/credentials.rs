//! In-memory credentials provider for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::auth::credentials::Credentials;
use crate::traits::{CredentialsError, CredentialsProvider};

/// In-memory credentials provider for testing.
///
/// Clones share the same storage, so a test can hand one clone to the
/// API client and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    credentials: Arc<Mutex<Option<Credentials>>>,
    save_should_fail: Arc<Mutex<bool>>,
    load_should_fail: Arc<Mutex<bool>>,
}

impl InMemoryCredentials {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider holding the given credentials.
    pub fn with_credentials(creds: Credentials) -> Self {
        let provider = Self::new();
        provider.set_credentials(Some(creds));
        provider
    }

    /// Create a provider holding only an access token.
    pub fn with_token(token: &str) -> Self {
        Self::with_credentials(Credentials {
            access_token: Some(token.to_string()),
            ..Default::default()
        })
    }

    /// Configure whether save should fail.
    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether load should fail.
    pub fn set_load_should_fail(&self, should_fail: bool) {
        *self.load_should_fail.lock().unwrap() = should_fail;
    }

    /// Get the current credentials synchronously.
    pub fn get_credentials(&self) -> Option<Credentials> {
        self.credentials.lock().unwrap().clone()
    }

    /// Set credentials synchronously.
    pub fn set_credentials(&self, creds: Option<Credentials>) {
        *self.credentials.lock().unwrap() = creds;
    }

    /// Current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.get_credentials().and_then(|c| c.access_token)
    }
}

#[async_trait]
impl CredentialsProvider for InMemoryCredentials {
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError> {
        if *self.load_should_fail.lock().unwrap() {
            return Err(CredentialsError::LoadFailed("Mock load failure".to_string()));
        }
        Ok(self.get_credentials())
    }

    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError> {
        if *self.save_should_fail.lock().unwrap() {
            return Err(CredentialsError::SaveFailed("Mock save failure".to_string()));
        }
        self.set_credentials(Some(creds.clone()));
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        self.set_credentials(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load_clear() {
        let provider = InMemoryCredentials::new();
        assert!(provider.load().await.unwrap().is_none());

        provider
            .save(&Credentials {
                access_token: Some("t1".to_string()),
                refresh_token: Some("r1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(provider.access_token().as_deref(), Some("t1"));

        provider.clear().await.unwrap();
        assert!(provider.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failures() {
        let provider = InMemoryCredentials::with_token("t");
        provider.set_load_should_fail(true);
        provider.set_save_should_fail(true);

        assert!(matches!(provider.load().await, Err(CredentialsError::LoadFailed(_))));
        assert!(matches!(
            provider.save(&Credentials::default()).await,
            Err(CredentialsError::SaveFailed(_))
        ));
        assert_eq!(provider.access_token().as_deref(), Some("t"));
    }

    #[test]
    fn test_clone_shares_storage() {
        let provider = InMemoryCredentials::with_token("shared");
        let cloned = provider.clone();
        provider.set_credentials(None);
        assert!(cloned.get_credentials().is_none());
    }
}
