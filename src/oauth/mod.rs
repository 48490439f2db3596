//! OAuth app management
//!
//! Registers, updates and removes the OAuth apps that third parties use to
//! call the platform API. Payloads are validated locally before sending.

mod client;
mod types;

pub use client::OAuthApiService;
pub use types::{
    validate_redirect_uri, CreateOAuthClient, OAuthClient, OAuthClientCredentials,
    OAuthClientPage, OAuthScope, Pagination, UpdateOAuthClient, SUPPORTED_GRANT_TYPES,
};

#[cfg(test)]
mod tests;
