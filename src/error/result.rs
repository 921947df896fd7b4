//! Result type alias for herdview operations.

use super::context::ErrorContext;
use super::herd_error::HerdError;

/// Type alias for Results using HerdError.
pub type HerdResult<T> = Result<T, HerdError>;

/// Extension trait for Result types to add context to errors.
pub trait ResultExt<T> {
    /// Add context to an error if the result is Err.
    fn context(self, ctx: ErrorContext) -> HerdResult<T>;

    /// Add context using a closure (only called on error).
    fn with_context<F>(self, f: F) -> HerdResult<T>
    where
        F: FnOnce() -> ErrorContext;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<HerdError>,
{
    fn context(self, ctx: ErrorContext) -> HerdResult<T> {
        self.map_err(|e| e.into().with_context(ctx))
    }

    fn with_context<F>(self, f: F) -> HerdResult<T>
    where
        F: FnOnce() -> ErrorContext,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
