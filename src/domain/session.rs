//! Session state.
//!
//! [`Session`] is an explicit context object: created empty, populated once
//! by [`Session::bootstrap`] or by [`Session::login`], cleared on logout or
//! when the server rejects the stored token. Nothing else holds the
//! current user.

use crate::api::{ApiClient, RegisterOutcome};
use crate::error::{AuthError, HerdError, HerdResult};
use crate::models::{LoginRequest, RegisterRequest, UserProfile};

/// Refresh the access token when it expires within this many seconds.
const REFRESH_BUFFER_SECS: i64 = 5 * 60;

/// The signed-in user and the flags the views render from.
#[derive(Debug)]
pub struct Session {
    api: ApiClient,
    user: Option<UserProfile>,
    loading: bool,
    authenticating: bool,
    bootstrapped: bool,
}

impl Session {
    /// An empty session. `is_loading()` stays true until [`bootstrap`](Self::bootstrap) runs.
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            user: None,
            loading: true,
            authenticating: false,
            bootstrapped: false,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_authenticating(&self) -> bool {
        self.authenticating
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// True when the signed-in user may review diagnoses.
    pub fn can_review(&self) -> bool {
        self.user.as_ref().is_some_and(UserProfile::can_review)
    }

    /// Restore the user from the stored token. Runs once; later calls
    /// return the current user.
    ///
    /// An expiring token is refreshed first. A rejected token is cleared.
    /// Network failures leave the token in place and the session empty.
    pub async fn bootstrap(&mut self) -> Option<&UserProfile> {
        if self.bootstrapped {
            return self.user.as_ref();
        }
        self.bootstrapped = true;
        self.loading = true;

        let stored = match self.api.credentials().load().await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Could not read stored credentials: {}", e);
                None
            }
        };

        if let Some(creds) = stored.filter(|c| c.has_token() || c.can_refresh()) {
            let usable = if creds.has_token() && !creds.expires_within(REFRESH_BUFFER_SECS) {
                true
            } else if creds.can_refresh() {
                match self.api.refresh_access_token().await {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::info!("Stored session could not be renewed: {}", e);
                        false
                    }
                }
            } else {
                false
            };

            if usable {
                match self.api.fetch_profile().await {
                    Ok(profile) => {
                        tracing::info!(username = %profile.username, "Session restored");
                        self.user = Some(profile);
                    }
                    Err(err) => {
                        self.handle_auth_failure(&err).await;
                    }
                }
            } else {
                self.api.logout().await;
            }
        }

        self.loading = false;
        self.user.as_ref()
    }

    /// Sign in. On failure the previous session is left untouched.
    pub async fn login(&mut self, request: &LoginRequest) -> HerdResult<&UserProfile> {
        self.authenticating = true;
        let result = self.api.login(request).await;
        self.authenticating = false;

        let profile = result?;
        self.loading = false;
        self.bootstrapped = true;
        Ok(self.user.insert(profile))
    }

    /// Create an account. Does not change who is signed in.
    pub async fn register(&mut self, request: &RegisterRequest) -> HerdResult<RegisterOutcome> {
        self.authenticating = true;
        let result = self.api.register(request).await;
        self.authenticating = false;
        result
    }

    /// Forget the user and the stored token.
    pub async fn logout(&mut self) {
        self.api.logout().await;
        self.user = None;
    }

    /// Clear the session if `err` means the stored token is no longer
    /// accepted. Returns whether the session was cleared.
    pub async fn handle_auth_failure(&mut self, err: &HerdError) -> bool {
        let rejected = matches!(
            err.inner(),
            HerdError::Auth(AuthError::TokenRejected { .. })
        ) || err.http_status() == Some(401);

        if rejected {
            tracing::info!("Stored token rejected; clearing session");
            self.logout().await;
        } else {
            tracing::warn!(code = err.error_code(), "Session check failed: {}", err);
        }
        rejected
    }

    /// Fail with `AccessDenied` unless the user may review diagnoses.
    pub fn require_reviewer(&self, action: &str) -> Result<&UserProfile, AuthError> {
        match self.user.as_ref() {
            None => Err(AuthError::NotAuthenticated),
            Some(user) if user.can_review() => Ok(user),
            Some(_) => Err(AuthError::AccessDenied {
                action: action.to_string(),
            }),
        }
    }
}
