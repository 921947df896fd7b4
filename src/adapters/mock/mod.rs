//! Mock implementations for testing.
//!
//! Used by unit tests and by the integration tests in `tests/` to drive
//! the API client and view state without network or file system access.

pub mod credentials;
pub mod http;

pub use credentials::InMemoryCredentials;
pub use http::{MockHttpClient, MockResponse, RecordedRequest};
