//! Auth endpoints: login, register, profile, logout, token refresh.

use serde_json::{json, Value};

use super::client::ApiClient;
use super::{LOGIN_PATH, ME_PATH, REGISTER_PATH, TOKEN_REFRESH_PATH};
use crate::auth::Credentials;
use crate::error::{AuthError, ErrorContext, HerdError, HerdResult, NetworkError, ResultExt};
use crate::models::{LoginRequest, RegisterRequest, TokenPair, UserProfile};

/// What the register endpoint answered with.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    /// The body was a user profile.
    Profile(UserProfile),
    /// Anything else the backend chose to send back.
    Raw(Value),
}

/// Pull the message of a rejected auth request out of the error.
fn rejection_message(err: &HerdError) -> String {
    match err.inner() {
        HerdError::Network(net @ NetworkError::HttpStatus { .. }) => net.user_message(),
        other => other.user_message(),
    }
}

impl ApiClient {
    /// Sign in, persist the token pair, and return the profile.
    pub async fn login(&self, request: &LoginRequest) -> HerdResult<UserProfile> {
        request.validate()?;

        let tokens: TokenPair = match self.post(LOGIN_PATH, request).await {
            Ok(tokens) => tokens,
            Err(err) if matches!(err.http_status(), Some(400) | Some(401)) => {
                return Err(AuthError::InvalidCredentials {
                    message: rejection_message(&err),
                }
                .into());
            }
            Err(err) => return Err(err),
        };

        let creds = Credentials::from_tokens(
            tokens.access_token,
            tokens.refresh_token,
            Some(request.username.clone()),
        );
        self.credentials()
            .save(&creds)
            .await
            .map_err(|e| AuthError::CredentialsSaveFailed {
                message: e.to_string(),
            })?;

        tracing::info!(username = %request.username, "Signed in");
        self.fetch_profile().await
    }

    /// Create an account.
    ///
    /// Does not sign in; the caller decides whether to follow with [`login`](Self::login).
    pub async fn register(&self, request: &RegisterRequest) -> HerdResult<RegisterOutcome> {
        request.validate()?;

        let body: Value = match self.post(REGISTER_PATH, request).await {
            Ok(body) => body,
            Err(err) if err.http_status() == Some(400) => {
                return Err(AuthError::RegistrationRejected {
                    message: rejection_message(&err),
                }
                .into());
            }
            Err(err) => return Err(err),
        };

        tracing::info!(username = %request.username, "Registered account");
        Ok(match serde_json::from_value::<UserProfile>(body.clone()) {
            Ok(profile) => RegisterOutcome::Profile(profile),
            Err(_) => RegisterOutcome::Raw(body),
        })
    }

    /// Profile of the user the stored token belongs to.
    ///
    /// 401 and 403 mean the token is no longer usable.
    pub async fn fetch_profile(&self) -> HerdResult<UserProfile> {
        match self.get(ME_PATH).await {
            Ok(profile) => Ok(profile),
            Err(err) => match err.http_status() {
                Some(status @ (401 | 403)) => Err(AuthError::TokenRejected { status }.into()),
                _ => Err(err),
            },
        }
    }

    /// Forget the stored tokens. Never fails the caller.
    pub async fn logout(&self) {
        if let Err(e) = self.credentials().clear().await {
            tracing::warn!("Failed to clear stored credentials: {}", e);
        }
        tracing::info!("Signed out");
    }

    /// Exchange the stored refresh token for a new access token.
    pub async fn refresh_access_token(&self) -> HerdResult<Credentials> {
        let stored = self
            .credentials()
            .load()
            .await
            .map_err(|e| AuthError::CredentialsLoadFailed {
                message: e.to_string(),
            })?
            .unwrap_or_default();
        let refresh = stored.refresh_token.clone().ok_or(AuthError::NotAuthenticated)?;

        let tokens: TokenPair = self
            .post(TOKEN_REFRESH_PATH, &json!({ "refresh": refresh }))
            .await
            .map_err(|err| -> HerdError {
                AuthError::RefreshFailed {
                    message: err.to_string(),
                }
                .into()
            })?;

        let creds = Credentials::from_tokens(
            tokens.access_token,
            tokens.refresh_token.or(Some(refresh)),
            stored.username,
        );
        self.credentials()
            .save(&creds)
            .await
            .map_err(|e| AuthError::CredentialsSaveFailed {
                message: e.to_string(),
            })
            .context(ErrorContext::new("refresh_access_token").with_component("api"))?;

        tracing::debug!("Access token refreshed");
        Ok(creds)
    }
}
