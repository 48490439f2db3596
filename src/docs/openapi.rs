//! OpenAPI document model, merging and endpoint extraction
//!
//! Documents are modelled loosely: only the parts the docs service reads
//! (`paths`, `components`, `tags`) are typed, everything else is carried
//! through untouched.

use super::modules::{classify, ModuleInfo};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, Method, ModuleSource};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Prefix for secondary components whose names clash with the primary document
pub const PYTHON_COMPONENT_PREFIX: &str = "Python";

// ============================================================================
// Document Types
// ============================================================================

/// An OpenAPI 3.x document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    #[serde(default = "default_openapi_version")]
    pub openapi: String,

    #[serde(default)]
    pub info: JsonObject,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<JsonValue>,

    #[serde(default)]
    pub paths: JsonObject,

    #[serde(default, skip_serializing_if = "Components::is_empty")]
    pub components: Components,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    /// Any other top-level fields (security, externalDocs, x-*)
    #[serde(flatten)]
    pub extra: JsonObject,
}

fn default_openapi_version() -> String {
    "3.0.0".to_string()
}

/// The `components` section: a map of component kind to named components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(flatten)]
    pub kinds: BTreeMap<String, JsonObject>,
}

impl Components {
    /// True if no component kind is present
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Named schemas (`components.schemas`)
    pub fn schemas(&self) -> Option<&JsonObject> {
        self.kinds.get("schemas")
    }
}

/// A top-level tag object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

impl OpenApiDocument {
    /// Parse a document from JSON or YAML text
    pub fn parse(text: &str) -> Result<Self> {
        let doc: Self = if text.trim_start().starts_with('{') {
            serde_json::from_str(text)?
        } else {
            serde_yaml::from_str(text)?
        };
        doc.validate()?;
        Ok(doc)
    }

    /// Basic structural check
    pub fn validate(&self) -> Result<()> {
        if !self.openapi.starts_with('3') {
            return Err(Error::openapi(format!(
                "unsupported OpenAPI version '{}'",
                self.openapi
            )));
        }
        for (path, item) in &self.paths {
            if !path.starts_with('/') {
                return Err(Error::openapi(format!("path '{path}' must start with '/'")));
            }
            if !item.is_object() {
                return Err(Error::openapi(format!("path item '{path}' is not an object")));
            }
        }
        Ok(())
    }

    /// Number of operations across all paths
    pub fn operation_count(&self) -> usize {
        self.paths
            .values()
            .filter_map(JsonValue::as_object)
            .map(|item| {
                Method::ALL
                    .iter()
                    .filter(|m| item.contains_key(m.openapi_key()))
                    .count()
            })
            .sum()
    }
}

// ============================================================================
// Merging
// ============================================================================

/// Result of merging the backend document with the Python document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedSpec {
    /// The unified document
    pub document: OpenApiDocument,
    /// Paths whose operations came from the secondary document
    pub secondary_paths: BTreeSet<String>,
    /// Renamed secondary components, `kind/name` -> new name
    pub renamed_components: BTreeMap<String, String>,
}

impl MergedSpec {
    /// A merged spec made from a single document
    pub fn single(document: OpenApiDocument) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    /// Which service a path belongs to
    pub fn source_of(&self, path: &str) -> ModuleSource {
        if self.secondary_paths.contains(path) {
            ModuleSource::Python
        } else {
            ModuleSource::Backend
        }
    }
}

/// Merge two documents
///
/// - `paths`: the secondary document wins on clash
/// - components: the primary value is kept; a clashing secondary value is
///   added as `{prefix}{Name}` and the secondary's `$ref`s are rewritten
/// - `tags`: union by name, primary tag object kept
pub fn merge_documents(
    primary: &OpenApiDocument,
    secondary: &OpenApiDocument,
    prefix: &str,
) -> MergedSpec {
    let mut document = primary.clone();
    let mut renamed_components = BTreeMap::new();
    let mut ref_rewrites = BTreeMap::new();

    for (kind, components) in &secondary.components.kinds {
        let target = document.components.kinds.entry(kind.clone()).or_default();
        let mut assigned: BTreeSet<String> = BTreeSet::new();
        for name in components.keys() {
            if target.contains_key(name) {
                let new_name = prefixed_name(prefix, name, |candidate| {
                    target.contains_key(candidate)
                        || components.contains_key(candidate)
                        || assigned.contains(candidate)
                });
                assigned.insert(new_name.clone());
                ref_rewrites.insert(
                    format!("#/components/{kind}/{name}"),
                    format!("#/components/{kind}/{new_name}"),
                );
                renamed_components.insert(format!("{kind}/{name}"), new_name);
            }
        }
    }

    for (kind, components) in &secondary.components.kinds {
        for (name, value) in components {
            let mut value = value.clone();
            rewrite_refs(&mut value, &ref_rewrites);
            let key = renamed_components
                .get(&format!("{kind}/{name}"))
                .cloned()
                .unwrap_or_else(|| name.clone());
            document
                .components
                .kinds
                .entry(kind.clone())
                .or_default()
                .insert(key, value);
        }
    }

    let mut secondary_paths = BTreeSet::new();
    for (path, item) in &secondary.paths {
        let mut item = item.clone();
        rewrite_refs(&mut item, &ref_rewrites);
        document.paths.insert(path.clone(), item);
        secondary_paths.insert(path.clone());
    }

    for tag in &secondary.tags {
        if !document.tags.iter().any(|t| t.name == tag.name) {
            document.tags.push(tag.clone());
        }
    }

    for (key, value) in &secondary.extra {
        document
            .extra
            .entry(key.clone())
            .or_insert_with(|| value.clone());
    }

    MergedSpec {
        document,
        secondary_paths,
        renamed_components,
    }
}

/// Pick a free `{prefix}{name}` key, adding a numeric suffix if needed
fn prefixed_name(prefix: &str, name: &str, taken: impl Fn(&str) -> bool) -> String {
    let base = format!("{prefix}{name}");
    if !taken(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}

/// Rewrite `$ref` strings in place
fn rewrite_refs(value: &mut JsonValue, rewrites: &BTreeMap<String, String>) {
    if rewrites.is_empty() {
        return;
    }
    match value {
        JsonValue::Object(map) => {
            for (key, child) in map.iter_mut() {
                if key == "$ref" {
                    if let Some(target) = child.as_str().and_then(|r| rewrites.get(r)) {
                        *child = JsonValue::String(target.clone());
                    }
                } else {
                    rewrite_refs(child, rewrites);
                }
            }
        }
        JsonValue::Array(items) => {
            for item in items {
                rewrite_refs(item, rewrites);
            }
        }
        _ => {}
    }
}

// ============================================================================
// Endpoints
// ============================================================================

/// A documented operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointInfo {
    pub path: String,
    pub method: Method,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    pub module_id: String,
    pub source: ModuleSource,
}

/// List every operation of a merged spec, classified into modules
pub fn extract_endpoints(merged: &MergedSpec, modules: &[ModuleInfo]) -> Vec<EndpointInfo> {
    let mut endpoints = Vec::new();

    for (path, item) in &merged.document.paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        for method in Method::ALL {
            let Some(operation) = item.get(method.openapi_key()).and_then(JsonValue::as_object)
            else {
                continue;
            };

            let tags: Vec<String> = operation
                .get("tags")
                .and_then(JsonValue::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(JsonValue::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();

            let text = |key: &str| {
                operation
                    .get(key)
                    .and_then(JsonValue::as_str)
                    .map(String::from)
            };

            endpoints.push(EndpointInfo {
                path: path.clone(),
                method,
                operation_id: text("operationId"),
                summary: text("summary"),
                description: text("description"),
                deprecated: operation
                    .get("deprecated")
                    .and_then(JsonValue::as_bool)
                    .unwrap_or(false),
                module_id: classify(&tags, modules).to_string(),
                tags,
                source: merged.source_of(path),
            });
        }
    }

    endpoints
}
