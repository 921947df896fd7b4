//! herdview - a terminal client for the cattle diagnosis backend
//!
//! This library exposes modules for use by the binary and integration tests.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod cli;
pub mod cli_output;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod notifications;
pub mod traits;
pub mod view_state;
