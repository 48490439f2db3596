//! HTTP client module
//!
//! Provides the HTTP client shared by the backend, Python service and
//! Crawling Manager integrations.
//!
//! # Features
//!
//! - **Base URL joining**: callers pass API paths, not full URLs
//! - **Bearer auth**: admin token attached to every request
//! - **Error classification**: non-2xx responses surface as `Error::HttpStatus`

mod client;

pub use client::{path_segment, unwrap_field, HttpClient, HttpClientConfig, RequestConfig};
