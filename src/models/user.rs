//! User profile and auth payloads.

use serde::{Deserialize, Serialize};

use super::deserialize_nullable_string;
use crate::error::ValidationError;

/// Account role. Unknown roles deserialize as [`Role::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Farmer,
    Vet,
    Admin,
    #[serde(other)]
    Other,
}

impl Role {
    /// Veterinarians and admins may review diagnoses.
    pub fn can_review(&self) -> bool {
        matches!(self, Role::Vet | Role::Admin)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Farmer => "Farmer",
            Role::Vet => "Veterinarian",
            Role::Admin => "Admin",
            Role::Other => "Other",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "farmer" => Ok(Role::Farmer),
            "vet" | "veterinarian" => Ok(Role::Vet),
            "admin" => Ok(Role::Admin),
            other => Err(ValidationError::UnknownValue {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

/// The signed-in user as returned by `GET /api/auth/me/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub farm_name: String,
}

impl UserProfile {
    /// Full name when set, otherwise the username.
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }

    pub fn can_review(&self) -> bool {
        self.role.can_review()
    }
}

/// Body of `POST /api/auth/login/`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "username" });
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField { field: "password" });
        }
        Ok(())
    }
}

/// Body of `POST /api/auth/register/`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub full_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub farm_name: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "username" });
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "email" });
        }
        if !self.email.contains('@') {
            return Err(ValidationError::InvalidField {
                field: "email",
                message: "must be an email address".to_string(),
            });
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField { field: "password" });
        }
        Ok(())
    }

    /// Credentials to sign in with once the account exists.
    pub fn login_request(&self) -> LoginRequest {
        LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }
}

/// Token pair issued by the login and refresh endpoints.
///
/// The backend answers with `access`/`refresh`; `access_token` is accepted too.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    #[serde(alias = "access")]
    pub access_token: String,
    #[serde(default, alias = "refresh")]
    pub refresh_token: Option<String>,
}
