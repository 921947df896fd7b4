//! Error category classification.
//!
//! Categories drive how a failure is surfaced: load paths absorb
//! everything into an empty view, mutating paths turn the category into a
//! user-visible notice with a recovery hint.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS or timeout problems. The request never completed.
    Network,

    /// Authentication or authorization failures.
    Auth,

    /// The backend answered with a 5xx status.
    Server,

    /// The backend rejected the request (4xx other than auth).
    Rejected,

    /// A local constraint failed before anything was sent.
    Validation,

    /// Filesystem or OS errors.
    System,

    /// Missing or malformed configuration.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if the same request might succeed when re-triggered.
    ///
    /// Nothing in the client retries automatically; this only selects the
    /// wording of the notice.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Rejected => "rejected",
            ErrorCategory::Validation => "validation",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your connection to the farm server and try again",
            ErrorCategory::Auth => "Run `herdview login` to sign in again",
            ErrorCategory::Server => "The server may be experiencing issues. Please try again later",
            ErrorCategory::Rejected => "Check the values you entered and try again",
            ErrorCategory::Validation => "Please check your input and try again",
            ErrorCategory::System => "Check file permissions and available disk space",
            ErrorCategory::Configuration => "Check HERDVIEW_* environment variables",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
