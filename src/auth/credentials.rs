//! Credentials storage for herdview.
//!
//! Tokens are stored in `~/.herdview/.credentials.json`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// The credentials directory name.
pub const CREDENTIALS_DIR: &str = ".herdview";

/// The credentials file name.
pub const CREDENTIALS_FILE: &str = ".credentials.json";

/// Tokens issued by the backend auth API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    /// Bearer token attached to every request.
    pub access_token: Option<String>,
    /// Token used to obtain a new access token.
    pub refresh_token: Option<String>,
    /// Access token expiry as Unix timestamp, when the token carries one.
    pub expires_at: Option<i64>,
    /// Username the tokens were issued to.
    pub username: Option<String>,
}

impl Credentials {
    /// Build credentials from a freshly issued token pair.
    pub fn from_tokens(access: String, refresh: Option<String>, username: Option<String>) -> Self {
        let expires_at = jwt_expiry(&access);
        Self {
            access_token: Some(access),
            refresh_token: refresh,
            expires_at,
            username,
        }
    }

    /// Check if the credentials have an access token.
    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// Check if the access token is known to be expired.
    ///
    /// A token without a decodable expiry is never considered expired;
    /// the server has the final say.
    pub fn is_expired(&self) -> bool {
        self.expires_within(0)
    }

    /// Check if the access token expires within `secs` seconds.
    pub fn expires_within(&self, secs: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => chrono::Utc::now().timestamp() + secs >= expires_at,
            None => false,
        }
    }

    /// Check if a refresh is possible.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

#[derive(Deserialize)]
struct JwtClaims {
    exp: i64,
}

/// Extract the `exp` claim from a JWT access token.
///
/// Returns None if the token is not a JWT or carries no expiry.
pub fn jwt_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: JwtClaims = serde_json::from_slice(&bytes).ok()?;
    Some(claims.exp)
}

/// Manages credential storage and retrieval.
#[derive(Debug, Clone)]
pub struct CredentialsManager {
    credentials_path: PathBuf,
}

impl CredentialsManager {
    /// Create a manager for the default location under the home directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::with_path(home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE)))
    }

    /// Create a manager for an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: path.into(),
        }
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Load credentials from the credentials file.
    ///
    /// A missing or unreadable file yields empty credentials.
    pub fn load(&self) -> Credentials {
        let file = match File::open(&self.credentials_path) {
            Ok(f) => f,
            Err(_) => return Credentials::default(),
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(creds) => creds,
            Err(e) => {
                tracing::warn!(
                    path = %self.credentials_path.display(),
                    "Ignoring unreadable credentials file: {}",
                    e
                );
                Credentials::default()
            }
        }
    }

    /// Save credentials, creating the parent directory if needed.
    pub fn save(&self, credentials: &Credentials) -> io::Result<()> {
        if let Some(parent) = self.credentials_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.credentials_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, credentials)?;
        writer.flush()
    }

    /// Remove the credentials file. A missing file is not an error.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.credentials_path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
