//! Network-related error types.
//!
//! A request either never completed (connection, timeout, transport) or
//! completed with a non-2xx status. Both count as a network failure for the
//! caller; the status variant keeps the response body for diagnostics.

use std::fmt;

use crate::traits::HttpError;

/// Longest body excerpt kept in messages and logs.
const BODY_EXCERPT_LEN: usize = 200;

/// Network-specific error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Connection to the server failed.
    ConnectionFailed { url: String, message: String },

    /// Request exceeded the client's fixed timeout.
    Timeout { url: String },

    /// Server answered with a non-2xx status.
    HttpStatus { status: u16, body: String },

    /// Body could not be decoded into the expected shape.
    InvalidResponse { message: String },

    /// Request was cancelled before completion.
    Cancelled,

    /// Anything else the transport reported.
    Other { message: String },
}

impl NetworkError {
    /// Build from a transport-level error raised by an [`HttpClient`](crate::traits::HttpClient).
    pub fn from_transport(err: HttpError, url: &str) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed {
                url: url.to_string(),
                message,
            },
            HttpError::Timeout(_) => NetworkError::Timeout {
                url: url.to_string(),
            },
            HttpError::Cancelled => NetworkError::Cancelled,
            HttpError::InvalidUrl(message) => NetworkError::ConnectionFailed {
                url: url.to_string(),
                message,
            },
            HttpError::Io(message) | HttpError::Other(message) => NetworkError::Other { message },
        }
    }

    /// HTTP status if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 5xx responses and transport failures.
    pub fn is_transient(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } | NetworkError::Timeout { .. } => true,
            NetworkError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            NetworkError::InvalidResponse { .. }
            | NetworkError::Cancelled
            | NetworkError::Other { .. } => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { url, .. } => {
                format!("Unable to reach the farm server at {}.", extract_host_from_url(url))
            }
            NetworkError::Timeout { .. } => {
                "The server took too long to respond. Please try again.".to_string()
            }
            NetworkError::HttpStatus { status, body } => match *status {
                400 => match field_errors(body) {
                    Some(detail) => format!("The server rejected the request: {}", detail),
                    None => "The request was invalid. Please check your input.".to_string(),
                },
                401 => "Authentication required. Please sign in again.".to_string(),
                403 => "You don't have permission for this action.".to_string(),
                404 => "The requested record was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => "The server is experiencing issues. Please try again later.".to_string(),
                _ => format!("The server returned an error (HTTP {}).", status),
            },
            NetworkError::InvalidResponse { .. } => {
                "Received an unexpected response from the server.".to_string()
            }
            NetworkError::Cancelled => "The request was cancelled.".to_string(),
            NetworkError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::InvalidResponse { .. } => "E_NET_INVALID",
            NetworkError::Cancelled => "E_NET_CANCEL",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::ConnectionFailed { url, message } => {
                write!(f, "Connection failed to '{}': {}", url, message)
            }
            NetworkError::Timeout { url } => write!(f, "Request to '{}' timed out", url),
            NetworkError::HttpStatus { status, body } => {
                write!(f, "HTTP {} error: {}", status, body_excerpt(body))
            }
            NetworkError::InvalidResponse { message } => write!(f, "Invalid response: {}", message),
            NetworkError::Cancelled => write!(f, "Request cancelled"),
            NetworkError::Other { message } => write!(f, "Network error: {}", message),
        }
    }
}

impl std::error::Error for NetworkError {}

/// Truncate a response body for display.
pub(crate) fn body_excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Flatten a DRF-style `{"field": ["message", ...]}` body into one line.
fn field_errors(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    let mut parts = Vec::new();
    for (field, messages) in object {
        let text = match messages {
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            serde_json::Value::String(s) => s.clone(),
            _ => continue,
        };
        if field == "detail" || field == "non_field_errors" {
            parts.push(text);
        } else {
            parts.push(format!("{}: {}", field, text));
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

/// Extract the host portion from a URL string.
fn extract_host_from_url(url: &str) -> String {
    let url_lower = url.to_lowercase();
    let without_scheme = if url_lower.starts_with("https://") {
        &url[8..]
    } else if url_lower.starts_with("http://") {
        &url[7..]
    } else {
        url
    };

    without_scheme
        .split(&['/', ':'][..])
        .next()
        .unwrap_or(url)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_connection_failed() {
        let err = NetworkError::from_transport(
            HttpError::ConnectionFailed("refused".to_string()),
            "http://farm.local:8000/api/cattle/",
        );
        assert_eq!(
            err,
            NetworkError::ConnectionFailed {
                url: "http://farm.local:8000/api/cattle/".to_string(),
                message: "refused".to_string(),
            }
        );
        assert!(err.is_transient());
        assert!(err.user_message().contains("farm.local"));
    }

    #[test]
    fn test_from_transport_timeout() {
        let err = NetworkError::from_transport(HttpError::Timeout("30s".to_string()), "http://x/");
        assert_eq!(err.error_code(), "E_NET_TIMEOUT");
        assert!(err.is_transient());
    }

    #[test]
    fn test_http_status_transient_only_for_server_errors() {
        let e500 = NetworkError::HttpStatus { status: 500, body: String::new() };
        let e404 = NetworkError::HttpStatus { status: 404, body: String::new() };
        assert!(e500.is_transient());
        assert!(!e404.is_transient());
        assert_eq!(e404.status(), Some(404));
        assert_eq!(NetworkError::Cancelled.status(), None);
    }

    #[test]
    fn test_user_message_flattens_field_errors() {
        let err = NetworkError::HttpStatus {
            status: 400,
            body: r#"{"tag_number": ["cattle with this tag number already exists."]}"#.to_string(),
        };
        assert_eq!(
            err.user_message(),
            "The server rejected the request: tag_number: cattle with this tag number already exists."
        );
    }

    #[test]
    fn test_user_message_detail_field() {
        let err = NetworkError::HttpStatus {
            status: 400,
            body: r#"{"detail": "Bad payload"}"#.to_string(),
        };
        assert_eq!(err.user_message(), "The server rejected the request: Bad payload");
    }

    #[test]
    fn test_user_message_plain_400() {
        let err = NetworkError::HttpStatus { status: 400, body: "<html>".to_string() };
        assert!(err.user_message().contains("invalid"));
    }

    #[test]
    fn test_display_truncates_body() {
        let err = NetworkError::HttpStatus { status: 502, body: "x".repeat(1000) };
        let display = err.to_string();
        assert!(display.starts_with("HTTP 502 error: "));
        assert_eq!(display.len(), "HTTP 502 error: ".len() + BODY_EXCERPT_LEN);
    }

    #[test]
    fn test_extract_host_from_url() {
        assert_eq!(extract_host_from_url("https://example.com/path"), "example.com");
        assert_eq!(extract_host_from_url("http://example.com:8080/path"), "example.com");
        assert_eq!(extract_host_from_url("example.com"), "example.com");
    }
}
