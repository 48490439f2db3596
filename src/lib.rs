// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # PipesHub Control Plane
//!
//! Unified API documentation, connector configuration and OAuth app
//! management for the PipesHub platform.
//!
//! ## Features
//!
//! - **Unified API Docs**: Merge the backend OpenAPI document with the Python
//!   connector service document and classify every operation into a module
//! - **Connector Configuration**: Schema-driven two-step editor with
//!   conditional fields, credential checks and Crawling Manager scheduling
//! - **OAuth Apps**: Register and manage OAuth apps with local payload checks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pipeshub_control::{config::DocsConfig, docs::ApiDocsService, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let docs = ApiDocsService::new(DocsConfig::default())?;
//!     docs.init().await;
//!
//!     for module in docs.modules().await {
//!         println!("{}: {} endpoints", module.info.name, module.endpoint_count);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          CLI / Server                         │
//! │  serve  modules  endpoints  merge  check-credential  configure│
//! └───────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌──────────────────┬────────────┴───────────┬──────────────────┐
//! │       Docs       │        Connector       │      OAuth       │
//! ├──────────────────┼────────────────────────┼──────────────────┤
//! │ Load / Fetch     │ Schema & Validation    │ Apps CRUD        │
//! │ Merge            │ Credentials            │ Secrets          │
//! │ Classify         │ Editor & Save          │ Scopes           │
//! │ HTML Viewer      │ Backend & Scheduler    │                  │
//! └──────────────────┴────────────────────────┴──────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Application configuration
pub mod config;

/// HTTP client for backend and service calls
pub mod http;

/// Unified API documentation
pub mod docs;

/// Connector configuration
pub mod connector;

/// OAuth app management
pub mod oauth;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
