//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use crate::auth::credentials::{CREDENTIALS_DIR, CREDENTIALS_FILE};
use crate::error::ValidationError;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Fixed per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Rows per page in list views.
pub const DEFAULT_PAGE_SIZE: usize = 10;

pub const ENV_API_URL: &str = "HERDVIEW_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "HERDVIEW_TIMEOUT_SECS";
pub const ENV_PAGE_SIZE: &str = "HERDVIEW_PAGE_SIZE";
pub const ENV_EXPORT_DIR: &str = "HERDVIEW_EXPORT_DIR";

/// Configuration for the API client and list views.
///
/// # Example
///
/// ```ignore
/// use herdview::config::ClientConfig;
///
/// let config = ClientConfig::from_env()?
///     .with_page_size(25)?
///     .with_export_dir("/tmp/exports");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend origin, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Default page size for list views (>= 1)
    pub page_size: usize,
    /// Where CSV exports are written
    pub export_dir: PathBuf,
    /// Token file; None means `~/.herdview/.credentials.json`
    pub credentials_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
            export_dir: PathBuf::from("."),
            credentials_path: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend origin. A trailing slash is dropped.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the page size. Zero is rejected.
    pub fn with_page_size(mut self, size: usize) -> Result<Self, ValidationError> {
        if size == 0 {
            return Err(ValidationError::InvalidPageSize(size));
        }
        self.page_size = size;
        Ok(self)
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Token file location, resolving the default under the home directory.
    pub fn resolved_credentials_path(&self) -> Option<PathBuf> {
        self.credentials_path
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE)))
    }

    /// Defaults overridden by `HERDVIEW_*` environment variables.
    ///
    /// Empty variables are ignored; malformed ones are an error.
    pub fn from_env() -> Result<Self, ValidationError> {
        let mut config = Self::default();

        if let Some(url) = env_value(ENV_API_URL) {
            config = config.with_base_url(url);
        }
        if let Some(raw) = env_value(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|_| ValidationError::InvalidField {
                field: "HERDVIEW_TIMEOUT_SECS",
                message: format!("expected whole seconds, got '{}'", raw),
            })?;
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        if let Some(raw) = env_value(ENV_PAGE_SIZE) {
            let size: usize = raw.parse().map_err(|_| ValidationError::InvalidField {
                field: "HERDVIEW_PAGE_SIZE",
                message: format!("expected a positive number, got '{}'", raw),
            })?;
            config = config.with_page_size(size)?;
        }
        if let Some(dir) = env_value(ENV_EXPORT_DIR) {
            config = config.with_export_dir(dir);
        }

        tracing::debug!(base_url = %config.base_url, page_size = config.page_size, "Loaded client config");
        Ok(config)
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new()
            .with_base_url("https://farm.example/")
            .with_export_dir("/tmp/out")
            .with_credentials_path("/tmp/creds.json")
            .with_page_size(25)
            .unwrap();

        assert_eq!(config.base_url, "https://farm.example");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.resolved_credentials_path(), Some(PathBuf::from("/tmp/creds.json")));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert_eq!(
            ClientConfig::new().with_page_size(0),
            Err(ValidationError::InvalidPageSize(0))
        );
    }
}
