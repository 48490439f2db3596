//! Common types used throughout the control plane
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method of a documented operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
    OPTIONS,
}

impl Method {
    /// All methods, in the order operations are listed in docs
    pub const ALL: [Method; 7] = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::HEAD,
        Method::OPTIONS,
    ];

    /// Key used for this method inside an OpenAPI path item
    pub fn openapi_key(self) -> &'static str {
        match self {
            Method::GET => "get",
            Method::POST => "post",
            Method::PUT => "put",
            Method::PATCH => "patch",
            Method::DELETE => "delete",
            Method::HEAD => "head",
            Method::OPTIONS => "options",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.openapi_key().to_uppercase())
    }
}

// ============================================================================
// Module Source
// ============================================================================

/// Which service owns a documented module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleSource {
    /// The Node.js backend (static YAML document)
    #[default]
    Backend,
    /// The Python connector service (fetched document)
    Python,
}

// ============================================================================
// Sync Strategy
// ============================================================================

/// How a connector ingests data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStrategy {
    /// Sync runs only when triggered
    #[default]
    Manual,
    /// Sync runs on a schedule owned by the Crawling Manager
    Scheduled,
}

impl fmt::Display for SyncStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStrategy::Manual => f.write_str("MANUAL"),
            SyncStrategy::Scheduled => f.write_str("SCHEDULED"),
        }
    }
}

// ============================================================================
// API Envelope
// ============================================================================

/// Response wrapper used by every JSON endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed response carrying an error message
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_display() {
        assert_eq!(Method::GET.to_string(), "GET");
        assert_eq!(Method::DELETE.to_string(), "DELETE");
        assert_eq!(Method::OPTIONS.openapi_key(), "options");
    }

    #[test]
    fn test_sync_strategy_serde() {
        let json = serde_json::to_string(&SyncStrategy::Scheduled).unwrap();
        assert_eq!(json, "\"SCHEDULED\"");

        let strategy: SyncStrategy = serde_json::from_str("\"MANUAL\"").unwrap();
        assert_eq!(strategy, SyncStrategy::Manual);
    }

    #[test]
    fn test_module_source_serde() {
        let json = serde_json::to_string(&ModuleSource::Python).unwrap();
        assert_eq!(json, "\"python\"");
    }

    #[test]
    fn test_api_response_envelope() {
        let ok = serde_json::to_value(ApiResponse::success(42)).unwrap();
        assert_eq!(ok, serde_json::json!({ "success": true, "data": 42 }));

        let err = serde_json::to_value(ApiResponse::<()>::error("boom")).unwrap();
        assert_eq!(err, serde_json::json!({ "success": false, "error": "boom" }));
    }
}
