//! Authentication-related error types.

use std::fmt;

/// Authentication-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Login was refused (wrong username or password).
    InvalidCredentials { message: String },

    /// The stored token was rejected by the server (401/403 on a profile fetch).
    TokenRejected { status: u16 },

    /// No token is stored.
    NotAuthenticated,

    /// The signed-in user's role does not allow the action.
    AccessDenied { action: String },

    /// Refreshing the access token failed.
    RefreshFailed { message: String },

    /// Registration was refused by the server.
    RegistrationRejected { message: String },

    /// Credentials could not be loaded from storage.
    CredentialsLoadFailed { message: String },

    /// Credentials could not be written to storage.
    CredentialsSaveFailed { message: String },
}

impl AuthError {
    /// Check if signing in again would resolve the error.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            AuthError::TokenRejected { .. }
                | AuthError::NotAuthenticated
                | AuthError::RefreshFailed { .. }
                | AuthError::CredentialsLoadFailed { .. }
        )
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::InvalidCredentials { .. } => {
                "Login failed. Check your username and password.".to_string()
            }
            AuthError::TokenRejected { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            AuthError::NotAuthenticated => {
                "You are not signed in. Run `herdview login` first.".to_string()
            }
            AuthError::AccessDenied { action } => {
                format!("Only veterinarians and admins can {}.", action)
            }
            AuthError::RefreshFailed { .. } => {
                "Your session could not be renewed. Please sign in again.".to_string()
            }
            AuthError::RegistrationRejected { message } => {
                format!("Registration failed: {}", message)
            }
            AuthError::CredentialsLoadFailed { .. } => {
                "Could not load your saved session. Please sign in again.".to_string()
            }
            AuthError::CredentialsSaveFailed { .. } => {
                "Could not save your session. Please check file permissions.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials { .. } => "E_AUTH_INVALID",
            AuthError::TokenRejected { .. } => "E_AUTH_TOKEN_REJECTED",
            AuthError::NotAuthenticated => "E_AUTH_NOT_AUTH",
            AuthError::AccessDenied { .. } => "E_AUTH_ACCESS",
            AuthError::RefreshFailed { .. } => "E_AUTH_REFRESH_FAIL",
            AuthError::RegistrationRejected { .. } => "E_AUTH_REGISTER",
            AuthError::CredentialsLoadFailed { .. } => "E_AUTH_CRED_LOAD",
            AuthError::CredentialsSaveFailed { .. } => "E_AUTH_CRED_SAVE",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials { message } => write!(f, "Invalid credentials: {}", message),
            AuthError::TokenRejected { status } => write!(f, "Token rejected (HTTP {})", status),
            AuthError::NotAuthenticated => write!(f, "Not authenticated"),
            AuthError::AccessDenied { action } => write!(f, "Access denied: {}", action),
            AuthError::RefreshFailed { message } => write!(f, "Token refresh failed: {}", message),
            AuthError::RegistrationRejected { message } => {
                write!(f, "Registration rejected: {}", message)
            }
            AuthError::CredentialsLoadFailed { message } => {
                write!(f, "Failed to load credentials: {}", message)
            }
            AuthError::CredentialsSaveFailed { message } => {
                write!(f, "Failed to save credentials: {}", message)
            }
        }
    }
}

impl std::error::Error for AuthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_rejected_requires_reauth() {
        let err = AuthError::TokenRejected { status: 401 };
        assert!(err.requires_reauth());
        assert_eq!(err.error_code(), "E_AUTH_TOKEN_REJECTED");
        assert!(err.user_message().contains("sign in"));
    }

    #[test]
    fn test_invalid_credentials_does_not_require_reauth() {
        let err = AuthError::InvalidCredentials {
            message: "No active account".to_string(),
        };
        assert!(!err.requires_reauth());
        assert!(err.to_string().contains("No active account"));
    }

    #[test]
    fn test_access_denied_names_action() {
        let err = AuthError::AccessDenied {
            action: "review diagnoses".to_string(),
        };
        assert_eq!(
            err.user_message(),
            "Only veterinarians and admins can review diagnoses."
        );
        assert!(!err.requires_reauth());
    }

    #[test]
    fn test_not_authenticated() {
        let err = AuthError::NotAuthenticated;
        assert!(err.requires_reauth());
        assert_eq!(err.to_string(), "Not authenticated");
    }
}
