//! Connector schema documents
//!
//! A schema describes the form for one connector type: which auth fields
//! exist, which sync strategies are allowed and which filters are offered.
//! It is fetched from the registry and drives validation.

use crate::types::{JsonObject, JsonValue, SyncStrategy};
use serde::{Deserialize, Serialize};

/// Kind of form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    #[default]
    Text,
    Password,
    Email,
    Url,
    Number,
    Select,
    Multiselect,
    Checkbox,
    Boolean,
    Textarea,
    Json,
}

/// Comparison used by conditional display rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    #[default]
    Equals,
    NotEquals,
    Contains,
    IsEmpty,
    IsNotEmpty,
}

/// Show a field only when another field satisfies a condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalDisplay {
    /// Name of the field the condition reads
    pub field: String,
    #[serde(default)]
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: JsonValue,
}

impl ConditionalDisplay {
    /// Evaluate against the current form values
    pub fn matches(&self, values: &JsonObject) -> bool {
        let current = values.get(&self.field).unwrap_or(&JsonValue::Null);
        match self.operator {
            ConditionOperator::Equals => loosely_equal(current, &self.value),
            ConditionOperator::NotEquals => !loosely_equal(current, &self.value),
            ConditionOperator::Contains => match current {
                JsonValue::Array(items) => items.iter().any(|i| loosely_equal(i, &self.value)),
                JsonValue::String(s) => self.value.as_str().is_some_and(|v| s.contains(v)),
                _ => false,
            },
            ConditionOperator::IsEmpty => is_empty_value(current),
            ConditionOperator::IsNotEmpty => !is_empty_value(current),
        }
    }
}

/// Compare values the way form inputs do: `"true"` equals `true`, `"5"` equals `5`
fn loosely_equal(a: &JsonValue, b: &JsonValue) -> bool {
    if a == b {
        return true;
    }
    match (a, b) {
        (JsonValue::String(s), other) | (other, JsonValue::String(s)) => match other {
            JsonValue::Bool(v) => s == &v.to_string(),
            JsonValue::Number(n) => s == &n.to_string(),
            _ => false,
        },
        _ => false,
    }
}

/// Empty string, null, empty array or empty object
pub fn is_empty_value(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        JsonValue::Array(a) => a.is_empty(),
        JsonValue::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// A single form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub name: String,

    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub field_type: FieldType,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub default_value: JsonValue,

    #[serde(default)]
    pub placeholder: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub min_length: Option<usize>,

    #[serde(default)]
    pub max_length: Option<usize>,

    /// Regex the value must match
    #[serde(default)]
    pub pattern: Option<String>,

    /// Message shown when `pattern` does not match
    #[serde(default)]
    pub pattern_message: Option<String>,

    /// Allowed values for SELECT/MULTISELECT
    #[serde(default)]
    pub options: Vec<String>,

    #[serde(default)]
    pub is_secret: bool,

    #[serde(default)]
    pub conditional_display: Option<ConditionalDisplay>,
}

impl FieldSchema {
    /// Minimal field definition
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            field_type,
            required: false,
            default_value: JsonValue::Null,
            placeholder: None,
            description: None,
            min_length: None,
            max_length: None,
            pattern: None,
            pattern_message: None,
            options: Vec::new(),
            is_secret: false,
            conditional_display: None,
        }
    }

    /// Mark the field required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Label used in error messages
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    /// Whether the field is shown for the given values
    pub fn is_visible(&self, values: &JsonObject) -> bool {
        self.conditional_display
            .as_ref()
            .map_or(true, |rule| rule.matches(values))
    }
}

/// Auth part of the schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSchema {
    #[serde(default)]
    pub fields: Vec<FieldSchema>,

    /// OAuth redirect URI registered for this connector
    #[serde(default)]
    pub redirect_uri: Option<String>,

    /// Whether the UI shows the redirect URI for copying
    #[serde(default)]
    pub display_redirect_uri: bool,
}

/// Sync part of the schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSchema {
    #[serde(default = "default_strategies")]
    pub supported_strategies: Vec<SyncStrategy>,

    #[serde(default)]
    pub custom_fields: Vec<FieldSchema>,

    /// Defaults for a newly scheduled connector
    #[serde(default)]
    pub scheduled_config: Option<super::types::ScheduledConfig>,
}

impl Default for SyncSchema {
    fn default() -> Self {
        Self {
            supported_strategies: default_strategies(),
            custom_fields: Vec::new(),
            scheduled_config: None,
        }
    }
}

fn default_strategies() -> Vec<SyncStrategy> {
    vec![SyncStrategy::Manual, SyncStrategy::Scheduled]
}

/// Filters part of the schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersSchema {
    #[serde(default)]
    pub sync: Vec<FieldSchema>,

    #[serde(default)]
    pub indexing: Vec<FieldSchema>,
}

/// Form schema of one connector type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSchema {
    #[serde(default)]
    pub auth: AuthSchema,

    #[serde(default)]
    pub sync: SyncSchema,

    #[serde(default)]
    pub filters: FiltersSchema,
}

/// Default values of every field that declares one
pub fn defaults_for(fields: &[FieldSchema]) -> JsonObject {
    fields
        .iter()
        .filter(|f| !f.default_value.is_null())
        .map(|f| (f.name.clone(), f.default_value.clone()))
        .collect()
}
