//! Error types for the PipesHub control plane
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the control plane
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Documentation Errors
    // ============================================================================
    #[error("Invalid OpenAPI document: {message}")]
    OpenApi { message: String },

    #[error("Python spec unavailable: {message}")]
    PythonSpecUnavailable { message: String },

    #[error("Module '{module}' not found")]
    ModuleNotFound { module: String },

    // ============================================================================
    // Connector Errors
    // ============================================================================
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Invalid credential '{field}': {message}")]
    Credential { field: String, message: String },

    #[error("Failed to save configuration: {message}")]
    Save { message: String },

    #[error("Scheduling request failed: {message}")]
    Scheduling { message: String },

    #[error("OAuth error: {message}")]
    OAuth { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an OpenAPI document error
    pub fn openapi(message: impl Into<String>) -> Self {
        Self::OpenApi {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a credential error for a specific field
    pub fn credential(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Credential {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a save error
    pub fn save(message: impl Into<String>) -> Self {
        Self::Save {
            message: message.into(),
        }
    }

    /// Create a scheduling error
    pub fn scheduling(message: impl Into<String>) -> Self {
        Self::Scheduling {
            message: message.into(),
        }
    }

    /// Create an OAuth error
    pub fn oauth(message: impl Into<String>) -> Self {
        Self::OAuth {
            message: message.into(),
        }
    }

    /// Create a file-not-found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// HTTP status this error maps to when surfaced through the REST API
    pub fn status_code(&self) -> u16 {
        match self {
            Error::FileNotFound { .. } | Error::ModuleNotFound { .. } => 404,
            Error::Validation { .. }
            | Error::Credential { .. }
            | Error::MissingConfigField { .. }
            | Error::InvalidConfigValue { .. }
            | Error::JsonParse(_)
            | Error::YamlParse(_) => 400,
            Error::HttpStatus { status, .. } if (400..600).contains(status) => *status,
            Error::Http(_) | Error::Timeout { .. } | Error::HttpStatus { .. } => 502,
            Error::PythonSpecUnavailable { .. } => 503,
            _ => 500,
        }
    }
}

/// Result type alias for the control plane
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
