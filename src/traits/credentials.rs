//! Credentials provider trait abstraction.
//!
//! The API client reads the bearer token through this trait on every
//! request, so a logout or token rotation takes effect immediately.

use async_trait::async_trait;

use crate::auth::Credentials;

/// Token store failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CredentialsError {
    #[error("Failed to load credentials: {0}")]
    LoadFailed(String),
    #[error("Failed to save credentials: {0}")]
    SaveFailed(String),
    #[error("Failed to clear credentials: {0}")]
    ClearFailed(String),
}

/// Where the signed-in user's tokens live.
///
/// # Example
///
/// ```ignore
/// use herdview::traits::CredentialsProvider;
///
/// async fn bearer<P: CredentialsProvider>(provider: &P) -> Option<String> {
///     provider.load().await.ok().flatten().and_then(|c| c.access_token)
/// }
/// ```
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// `Ok(None)` when nothing is stored.
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError>;

    /// Persist credentials, replacing whatever was stored.
    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError>;

    /// Forget the stored tokens. Clearing an empty store succeeds.
    async fn clear(&self) -> Result<(), CredentialsError>;
}
