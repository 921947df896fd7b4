//! Unified error type for herdview.

use std::fmt;

use super::auth::AuthError;
use super::category::ErrorCategory;
use super::context::ErrorContext;
use super::network::NetworkError;
use super::system::SystemError;
use super::validation::ValidationError;

/// Unified error type.
///
/// Every fallible operation in the crate returns [`HerdResult`](super::HerdResult);
/// the variant decides how the caller surfaces it.
#[derive(Debug)]
pub enum HerdError {
    /// Request never completed or came back non-2xx.
    Network(NetworkError),

    /// Authentication/authorization errors.
    Auth(AuthError),

    /// Local constraint failed.
    Validation(ValidationError),

    /// Filesystem errors.
    System(SystemError),

    /// Wrapped error with additional context.
    WithContext {
        error: Box<HerdError>,
        context: ErrorContext,
    },
}

impl HerdError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            HerdError::Network(NetworkError::HttpStatus { status, .. }) => match *status {
                401 | 403 => ErrorCategory::Auth,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Rejected,
            },
            HerdError::Network(NetworkError::InvalidResponse { .. }) => ErrorCategory::Server,
            HerdError::Network(_) => ErrorCategory::Network,
            HerdError::Auth(_) => ErrorCategory::Auth,
            HerdError::Validation(_) => ErrorCategory::Validation,
            HerdError::System(_) => ErrorCategory::System,
            HerdError::WithContext { error, .. } => error.category(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            HerdError::Network(err) => err.user_message(),
            HerdError::Auth(err) => err.user_message(),
            HerdError::Validation(err) => err.user_message(),
            HerdError::System(err) => err.user_message(),
            HerdError::WithContext { error, .. } => error.user_message(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            HerdError::Network(err) => err.error_code(),
            HerdError::Auth(err) => err.error_code(),
            HerdError::Validation(err) => err.error_code(),
            HerdError::System(err) => err.error_code(),
            HerdError::WithContext { error, .. } => error.error_code(),
        }
    }

    /// Attach context to this error.
    pub fn with_context(self, ctx: ErrorContext) -> Self {
        HerdError::WithContext {
            error: Box::new(self),
            context: ctx,
        }
    }

    /// Get the context if this error has one attached.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            HerdError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Get the inner error without context.
    pub fn inner(&self) -> &HerdError {
        match self {
            HerdError::WithContext { error, .. } => error.inner(),
            _ => self,
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }

    /// Check if this error means the stored token is no longer usable.
    pub fn requires_reauth(&self) -> bool {
        match self {
            HerdError::Auth(err) => err.requires_reauth(),
            HerdError::Network(NetworkError::HttpStatus { status: 401, .. }) => true,
            HerdError::WithContext { error, .. } => error.requires_reauth(),
            _ => false,
        }
    }

    /// HTTP status of the underlying response, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self.inner() {
            HerdError::Network(err) => err.status(),
            _ => None,
        }
    }
}

impl fmt::Display for HerdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HerdError::Network(err) => write!(f, "{}", err),
            HerdError::Auth(err) => write!(f, "{}", err),
            HerdError::Validation(err) => write!(f, "{}", err),
            HerdError::System(err) => write!(f, "{}", err),
            HerdError::WithContext { error, context } => write!(f, "{} ({})", error, context),
        }
    }
}

impl std::error::Error for HerdError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HerdError::Network(err) => Some(err),
            HerdError::Auth(err) => Some(err),
            HerdError::Validation(err) => Some(err),
            HerdError::System(err) => Some(err),
            HerdError::WithContext { error, .. } => error.source(),
        }
    }
}

impl From<NetworkError> for HerdError {
    fn from(err: NetworkError) -> Self {
        HerdError::Network(err)
    }
}

impl From<AuthError> for HerdError {
    fn from(err: AuthError) -> Self {
        HerdError::Auth(err)
    }
}

impl From<ValidationError> for HerdError {
    fn from(err: ValidationError) -> Self {
        HerdError::Validation(err)
    }
}

impl From<SystemError> for HerdError {
    fn from(err: SystemError) -> Self {
        HerdError::System(err)
    }
}

impl From<std::io::Error> for HerdError {
    fn from(err: std::io::Error) -> Self {
        use super::system::classify_io_error;
        HerdError::System(classify_io_error(err, None, "I/O operation"))
    }
}

impl From<serde_json::Error> for HerdError {
    fn from(err: serde_json::Error) -> Self {
        HerdError::Network(NetworkError::InvalidResponse {
            message: err.to_string(),
        })
    }
}
