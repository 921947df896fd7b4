//! Error handling for herdview.
//!
//! Two families matter to callers:
//!
//! - **Network failures**: the request never completed or came back non-2xx
//!   ([`NetworkError`]).
//! - **Validation failures**: a local constraint failed before anything was
//!   sent ([`ValidationError`]).
//!
//! [`AuthError`] and [`SystemError`] cover session and filesystem problems.
//! [`HerdError`] unifies all of them.
//!
//! | Category | Description | Surfaced as |
//! |----------|-------------|-------------|
//! | Network | Connection, timeout | Empty view on load, notice on mutation |
//! | Server | 5xx, undecodable body | Same as Network |
//! | Rejected | 4xx other than auth | Notice with field errors |
//! | Auth | Login failed, token rejected | Notice, session cleared on rejection |
//! | Validation | Local constraint | Notice, nothing sent |
//! | System | Filesystem | Notice |
//!
//! # Example
//!
//! ```ignore
//! use herdview::error::{ErrorContext, HerdResult, ResultExt};
//!
//! fn delete(api: &ApiClient, id: u64) -> HerdResult<()> {
//!     api.delete_cattle(id)
//!         .await
//!         .context(ErrorContext::new("delete_cattle").with_resource_id(id))
//! }
//! ```

mod auth;
mod category;
mod context;
mod herd_error;
mod network;
mod result;
mod system;
mod validation;

pub use auth::AuthError;
pub use category::ErrorCategory;
pub use context::ErrorContext;
pub use herd_error::HerdError;
pub use network::NetworkError;
pub(crate) use network::body_excerpt;
pub use result::{HerdResult, ResultExt};
pub use system::{classify_io_error, SystemError};
pub use validation::ValidationError;
