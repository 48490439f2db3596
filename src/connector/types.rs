//! Connector configuration documents
//!
//! These mirror the JSON stored by the backend for each connector instance.
//! Sections are replaced wholesale on save; there is no partial patching.

use crate::types::{JsonObject, SyncStrategy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Connector Instance
// ============================================================================

/// A connector instance as listed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorInfo {
    /// Connector type name, e.g. "SharePoint Online"
    pub name: String,

    /// Group the connector belongs to, e.g. "Google Workspace"
    #[serde(default)]
    pub app_group: String,

    /// Auth type of the connector, e.g. "OAUTH"
    #[serde(default)]
    pub auth_type: String,

    #[serde(default)]
    pub app_description: Option<String>,

    #[serde(default)]
    pub app_categories: Vec<String>,

    #[serde(default)]
    pub icon_path: Option<String>,

    /// Whether sync is currently enabled
    #[serde(default)]
    pub is_active: bool,

    /// Whether a configuration has been saved
    #[serde(default)]
    pub is_configured: bool,

    /// Whether the connector can be used by agents
    #[serde(default)]
    pub is_agent_active: bool,

    /// Scope: "team" or "personal"
    #[serde(default)]
    pub scope: Option<String>,
}

impl ConnectorInfo {
    /// Minimal instance, mostly for tests and CLI use
    pub fn new(name: impl Into<String>, app_group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            app_group: app_group.into(),
            auth_type: String::new(),
            app_description: None,
            app_categories: Vec::new(),
            icon_path: None,
            is_active: false,
            is_configured: false,
            is_agent_active: false,
            scope: None,
        }
    }
}

/// Which flag a toggle request flips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleType {
    /// Data sync
    Sync,
    /// Agent availability
    Agent,
}

// ============================================================================
// Config Sections
// ============================================================================

/// Full connector configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    #[serde(default)]
    pub auth: AuthSection,

    #[serde(default)]
    pub sync: SyncSection,

    #[serde(default)]
    pub filters: FiltersSection,
}

/// Config section names for section-level PUTs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSection {
    Auth,
    Sync,
    Filters,
}

impl ConfigSection {
    /// Path segment used by the backend
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigSection::Auth => "auth",
            ConfigSection::Sync => "sync",
            ConfigSection::Filters => "filters",
        }
    }
}

/// Authentication section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSection {
    #[serde(default)]
    pub auth_type: String,

    /// Field values keyed by schema field name
    #[serde(flatten)]
    pub values: JsonObject,
}

/// Sync section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSection {
    #[serde(default)]
    pub selected_strategy: SyncStrategy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_config: Option<ScheduledConfig>,

    /// Custom sync field values
    #[serde(flatten)]
    pub values: JsonObject,
}

/// Schedule parameters for `SCHEDULED` sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledConfig {
    /// Minutes between runs
    pub interval_minutes: u32,

    /// First run; also anchors the cron minute/hour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Stop after this many runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_repetitions: Option<u32>,
}

impl Default for ScheduledConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 60,
            start_time: None,
            timezone: default_timezone(),
            max_repetitions: None,
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Filters section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FiltersSection {
    /// Filters applied when selecting items to sync
    #[serde(default)]
    pub sync: JsonObject,

    /// Filters applied when selecting items to index
    #[serde(default)]
    pub indexing: JsonObject,
}

// ============================================================================
// OAuth
// ============================================================================

/// Response of the authorize endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeResponse {
    pub authorization_url: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// Response of the OAuth callback endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthCallbackResponse {
    pub success: bool,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
