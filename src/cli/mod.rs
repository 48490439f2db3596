//! CLI module
//!
//! Command-line interface for the control plane.
//!
//! # Commands
//!
//! - `serve` - Start the documentation server
//! - `modules` - List documentation modules
//! - `endpoints` - List classified endpoints
//! - `merge` - Write the merged OpenAPI document
//! - `check-credential` - Validate a credential file
//! - `configure` - Configure a connector through the backend

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, CredentialKind, OutputFormat};
pub use runner::{apply_values, Runner};
pub use server::{router, serve, AppState};

#[cfg(test)]
mod tests;
