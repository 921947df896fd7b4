//! Token persistence.
//!
//! Login, registration and profile calls go through [`crate::api`]; this
//! module only owns what is stored between runs.

pub mod credentials;

pub use credentials::{jwt_expiry, Credentials, CredentialsManager};
