//! Terminal presentation for CLI commands.
//!
//! Rendering only: these helpers format what the view state hands them and
//! hold no logic of their own.

mod boxes;
mod table;

pub use boxes::*;
pub use table::{display_width, fit, Table};
