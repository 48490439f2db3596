//! OAuth app documents and request payloads

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grant types an OAuth app may be registered for
pub const SUPPORTED_GRANT_TYPES: [&str; 3] =
    ["authorization_code", "refresh_token", "client_credentials"];

const LOOPBACK_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

/// A registered OAuth app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthClient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub client_id: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    #[serde(default)]
    pub allowed_grant_types: Vec<String>,
    #[serde(default)]
    pub allowed_scopes: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An app together with its client secret
///
/// The secret is only returned on creation and regeneration.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthClientCredentials {
    #[serde(flatten)]
    pub client: OAuthClient,
    pub client_secret: String,
}

impl std::fmt::Debug for OAuthClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClientCredentials")
            .field("client", &self.client)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// One page of apps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthClientPage {
    #[serde(default)]
    pub data: Vec<OAuthClient>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// A scope an app can request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthScope {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Payload for registering an app
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOAuthClient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub redirect_uris: Vec<String>,
    #[serde(default = "default_grant_types")]
    pub allowed_grant_types: Vec<String>,
    #[serde(default)]
    pub allowed_scopes: Vec<String>,
}

impl CreateOAuthClient {
    /// Payload with the default grant types and no scopes
    pub fn new(name: impl Into<String>, redirect_uris: Vec<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            redirect_uris,
            allowed_grant_types: default_grant_types(),
            allowed_scopes: Vec::new(),
        }
    }

    /// Check the payload before sending it
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_redirect_uris(&self.redirect_uris)?;
        validate_grant_types(&self.allowed_grant_types)
    }
}

/// Payload for changing an app; absent fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOAuthClient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uris: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_grant_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_scopes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UpdateOAuthClient {
    /// Check the fields that are present
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(uris) = &self.redirect_uris {
            validate_redirect_uris(uris)?;
        }
        if let Some(grants) = &self.allowed_grant_types {
            validate_grant_types(grants)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// ============================================================================
// Validation
// ============================================================================

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::oauth("app name must not be empty"));
    }
    Ok(())
}

fn validate_redirect_uris(uris: &[String]) -> Result<()> {
    if uris.is_empty() {
        return Err(Error::oauth("at least one redirect URI is required"));
    }
    uris.iter().try_for_each(|uri| validate_redirect_uri(uri))
}

/// Redirect URIs must be absolute and use https, except on loopback hosts
pub fn validate_redirect_uri(uri: &str) -> Result<()> {
    let parsed = url::Url::parse(uri)
        .map_err(|e| Error::oauth(format!("redirect URI '{uri}' is not absolute: {e}")))?;
    let host = parsed.host_str().unwrap_or_default();
    if host.is_empty() {
        return Err(Error::oauth(format!("redirect URI '{uri}' has no host")));
    }
    if parsed.fragment().is_some() {
        return Err(Error::oauth(format!(
            "redirect URI '{uri}' must not contain a fragment"
        )));
    }
    match parsed.scheme() {
        "https" => Ok(()),
        "http" if LOOPBACK_HOSTS.contains(&host) => Ok(()),
        scheme => Err(Error::oauth(format!(
            "redirect URI '{uri}' must use https (found {scheme})"
        ))),
    }
}

fn validate_grant_types(grants: &[String]) -> Result<()> {
    if grants.is_empty() {
        return Err(Error::oauth("at least one grant type is required"));
    }
    match grants
        .iter()
        .find(|g| !SUPPORTED_GRANT_TYPES.contains(&g.as_str()))
    {
        Some(unknown) => Err(Error::oauth(format!("unsupported grant type '{unknown}'"))),
        None => Ok(()),
    }
}

fn default_grant_types() -> Vec<String> {
    vec!["authorization_code".to_string(), "refresh_token".to_string()]
}

fn default_true() -> bool {
    true
}
