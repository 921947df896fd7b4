//! Domain objects shared by the views.
//!
//! - [`Session`] - the signed-in user and auth flags, passed explicitly to
//!   whatever needs them

pub mod session;

pub use session::Session;
