//! Service configuration
//!
//! Settings are read from an optional YAML file and then overridden by
//! environment variables. Every field has a default so the service starts
//! with no configuration at all.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable names
pub mod env {
    pub const PORT: &str = "PORT";
    pub const OPENAPI_SPEC_PATH: &str = "OPENAPI_SPEC_PATH";
    pub const PYTHON_CONNECTOR_URL: &str = "PYTHON_CONNECTOR_URL";
    pub const PYTHON_OPENAPI_FALLBACK: &str = "PYTHON_OPENAPI_FALLBACK";
    pub const PYTHON_SPEC_TIMEOUT_SECS: &str = "PYTHON_SPEC_TIMEOUT_SECS";
    pub const BACKEND_URL: &str = "BACKEND_URL";
    pub const ADMIN_JWT_TOKEN: &str = "ADMIN_JWT_TOKEN";
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Documentation settings
    #[serde(default)]
    pub docs: DocsConfig,

    /// Backend API settings
    #[serde(default)]
    pub backend: BackendConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            docs: DocsConfig::default(),
            backend: BackendConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

// ============================================================================
// Docs Config
// ============================================================================

/// Where the documentation service finds its OpenAPI documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocsConfig {
    /// Backend OpenAPI YAML document
    #[serde(default = "default_spec_path")]
    pub spec_path: PathBuf,

    /// Base URL of the Python connector service
    #[serde(default = "default_python_url")]
    pub python_url: String,

    /// Local copy of the Python OpenAPI document, used when the service is down
    #[serde(default)]
    pub python_fallback_path: Option<PathBuf>,

    /// Timeout for fetching the Python document, in seconds
    #[serde(default = "default_python_timeout")]
    pub python_timeout_secs: u64,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            spec_path: default_spec_path(),
            python_url: default_python_url(),
            python_fallback_path: None,
            python_timeout_secs: default_python_timeout(),
        }
    }
}

impl DocsConfig {
    /// Timeout for the Python spec fetch
    pub fn python_timeout(&self) -> Duration {
        Duration::from_secs(self.python_timeout_secs)
    }
}

fn default_spec_path() -> PathBuf {
    PathBuf::from("docs/pipeshub-openapi.yaml")
}

fn default_python_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_python_timeout() -> u64 {
    5
}

// ============================================================================
// Backend Config
// ============================================================================

/// Connection settings for the platform backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend API
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Bearer token for admin calls
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            token: None,
            timeout_secs: default_backend_timeout(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_backend_timeout() -> u64 {
    30
}

// ============================================================================
// Loading
// ============================================================================

impl AppConfig {
    /// Load from the process environment only
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load from a YAML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::from_yaml_file(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a YAML config file without environment overrides
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::file_not_found(path.display().to_string())
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {e}",
                    path.display()
                ))
            }
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Override fields from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(env::PORT) {
            self.port = port.parse().map_err(|_| Error::InvalidConfigValue {
                field: env::PORT.to_string(),
                message: format!("'{port}' is not a valid port"),
            })?;
        }
        if let Some(path) = lookup(env::OPENAPI_SPEC_PATH) {
            self.docs.spec_path = PathBuf::from(path);
        }
        if let Some(url) = lookup(env::PYTHON_CONNECTOR_URL) {
            self.docs.python_url = url;
        }
        if let Some(path) = lookup(env::PYTHON_OPENAPI_FALLBACK) {
            self.docs.python_fallback_path = Some(PathBuf::from(path));
        }
        if let Some(secs) = lookup(env::PYTHON_SPEC_TIMEOUT_SECS) {
            self.docs.python_timeout_secs =
                secs.parse().map_err(|_| Error::InvalidConfigValue {
                    field: env::PYTHON_SPEC_TIMEOUT_SECS.to_string(),
                    message: format!("'{secs}' is not a number of seconds"),
                })?;
        }
        if let Some(url) = lookup(env::BACKEND_URL) {
            self.backend.url = url;
        }
        if let Some(token) = lookup(env::ADMIN_JWT_TOKEN) {
            self.backend.token = Some(token).filter(|t| !t.is_empty());
        }

        url::Url::parse(&self.docs.python_url).map_err(|e| Error::InvalidConfigValue {
            field: env::PYTHON_CONNECTOR_URL.to_string(),
            message: e.to_string(),
        })?;
        url::Url::parse(&self.backend.url).map_err(|e| Error::InvalidConfigValue {
            field: env::BACKEND_URL.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
