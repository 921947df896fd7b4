//! CLI module for herdview.
//!
//! This module provides the command-line surface:
//! - Argument parsing ([`Cli`], clap derive)
//! - Command handlers that drive the session and view state
//!
//! # Usage
//!
//! ```ignore
//! use clap::Parser;
//! use herdview::cli::{run, Cli};
//!
//! let cli = Cli::parse();
//! run(cli).await?;
//! ```

pub mod args;
pub mod commands;

pub use args::{CattleCommand, CattleFields, Cli, Command, DiagnosesCommand, HistoryArgs, RegisterArgs};
pub use commands::run;
