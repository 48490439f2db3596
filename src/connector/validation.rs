//! Schema-driven field validation
//!
//! Produces one message per failing field. Hidden fields (conditional
//! display not satisfied) are skipped.

use super::schema::{is_empty_value, FieldSchema, FieldType};
use crate::types::{JsonObject, JsonValue};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Field name -> error message
pub type FieldErrors = BTreeMap<String, String>;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Check an email address
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value.trim())
}

/// Check an absolute http(s) URL
pub fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value.trim())
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
        .unwrap_or(false)
}

/// Validate one value against its field definition
pub fn validate_field(field: &FieldSchema, value: Option<&JsonValue>) -> Option<String> {
    let value = value.unwrap_or(&JsonValue::Null);
    let label = field.label();

    let unchecked = field.field_type == FieldType::Checkbox && value == &JsonValue::Bool(false);
    if is_empty_value(value) || unchecked {
        return field.required.then(|| format!("{label} is required"));
    }

    match field.field_type {
        FieldType::Number => {
            let ok = value.is_number()
                || value
                    .as_str()
                    .is_some_and(|s| s.trim().parse::<f64>().is_ok());
            if !ok {
                return Some(format!("{label} must be a number"));
            }
        }
        FieldType::Checkbox | FieldType::Boolean => {
            let ok = value.is_boolean() || matches!(value.as_str(), Some("true" | "false"));
            if !ok {
                return Some(format!("{label} must be true or false"));
            }
        }
        FieldType::Multiselect => {
            let Some(items) = value.as_array() else {
                return Some(format!("{label} must be a list"));
            };
            if !field.options.is_empty() {
                if let Some(bad) = items
                    .iter()
                    .filter_map(JsonValue::as_str)
                    .find(|i| !field.options.iter().any(|o| o == i))
                {
                    return Some(format!("{label}: '{bad}' is not an allowed option"));
                }
            }
        }
        _ => {}
    }

    let Some(text) = value.as_str() else {
        return match field.field_type {
            FieldType::Number
            | FieldType::Checkbox
            | FieldType::Boolean
            | FieldType::Multiselect
            | FieldType::Json => None,
            _ => Some(format!("{label} must be text")),
        };
    };

    let length = text.chars().count();
    if let Some(min) = field.min_length {
        if length < min {
            return Some(format!("{label} must be at least {min} characters"));
        }
    }
    if let Some(max) = field.max_length {
        if length > max {
            return Some(format!("{label} must be at most {max} characters"));
        }
    }

    match field.field_type {
        FieldType::Email if !is_valid_email(text) => {
            return Some(format!("{label} must be a valid email address"));
        }
        FieldType::Url if !is_valid_url(text) => {
            return Some(format!("{label} must be a valid URL"));
        }
        FieldType::Select
            if !field.options.is_empty() && !field.options.iter().any(|o| o == text) =>
        {
            return Some(format!("{label}: '{text}' is not an allowed option"));
        }
        FieldType::Json if serde_json::from_str::<JsonValue>(text).is_err() => {
            return Some(format!("{label} must be valid JSON"));
        }
        _ => {}
    }

    if let Some(pattern) = &field.pattern {
        match Regex::new(pattern) {
            Ok(re) if !re.is_match(text) => {
                return Some(
                    field
                        .pattern_message
                        .clone()
                        .unwrap_or_else(|| format!("{label} has an invalid format")),
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Ignoring invalid pattern for field '{}': {}", field.name, e);
            }
        }
    }

    None
}

/// Validate every visible field of a section
pub fn validate_fields(fields: &[FieldSchema], values: &JsonObject) -> FieldErrors {
    fields
        .iter()
        .filter(|f| f.is_visible(values))
        .filter_map(|f| validate_field(f, values.get(&f.name)).map(|msg| (f.name.clone(), msg)))
        .collect()
}

/// Keep only values of visible fields; unknown keys are kept as-is
pub fn visible_values(fields: &[FieldSchema], values: &JsonObject) -> JsonObject {
    values
        .iter()
        .filter(|(key, _)| {
            fields
                .iter()
                .find(|f| &f.name == *key)
                .map_or(true, |f| f.is_visible(values))
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
