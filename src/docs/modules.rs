//! Static module table for the unified API docs
//!
//! Each module owns a set of OpenAPI tags. Endpoints are assigned to the
//! first module (in table order) that owns one of their tags.

use crate::types::ModuleSource;
use serde::Serialize;

/// Module id used for endpoints that match no module
pub const UNKNOWN_MODULE: &str = "unknown";

/// Documented API module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub version: &'static str,
    pub base_path: &'static str,
    pub tags: &'static [&'static str],
    pub source: ModuleSource,
    pub order: u32,
    pub description: &'static str,
}

/// All documented modules, in display order
pub static MODULES: &[ModuleInfo] = &[
    ModuleInfo {
        id: "auth",
        name: "Authentication",
        version: "1.0.0",
        base_path: "/api/v1/userAccount",
        tags: &["Auth", "User Account", "SAML", "Org Auth Config"],
        source: ModuleSource::Backend,
        order: 1,
        description: "Login flows, sessions, SSO and organization auth settings",
    },
    ModuleInfo {
        id: "user-management",
        name: "User Management",
        version: "1.0.0",
        base_path: "/api/v1/users",
        tags: &["Users", "User Groups", "Teams", "Organizations"],
        source: ModuleSource::Backend,
        order: 2,
        description: "Users, groups, teams and organizations",
    },
    ModuleInfo {
        id: "storage",
        name: "Storage",
        version: "1.0.0",
        base_path: "/api/v1/document",
        tags: &["Storage", "Documents"],
        source: ModuleSource::Backend,
        order: 3,
        description: "Document upload, versioning and download",
    },
    ModuleInfo {
        id: "knowledge-base",
        name: "Knowledge Base",
        version: "1.0.0",
        base_path: "/api/v1/knowledgeBase",
        tags: &["Knowledge Base", "Records", "Folders"],
        source: ModuleSource::Backend,
        order: 4,
        description: "Knowledge bases, folders and indexed records",
    },
    ModuleInfo {
        id: "enterprise-search",
        name: "Enterprise Search",
        version: "1.0.0",
        base_path: "/api/v1/conversations",
        tags: &["Conversations", "Semantic Search", "Agents"],
        source: ModuleSource::Backend,
        order: 5,
        description: "Conversations, agents and semantic search",
    },
    ModuleInfo {
        id: "configuration-manager",
        name: "Configuration Manager",
        version: "1.0.0",
        base_path: "/api/v1/configurationManager",
        tags: &["Configuration", "AI Models", "SMTP"],
        source: ModuleSource::Backend,
        order: 6,
        description: "Platform, AI model and SMTP configuration",
    },
    ModuleInfo {
        id: "crawling-manager",
        name: "Crawling Manager",
        version: "1.0.0",
        base_path: "/api/v1/crawlingManager",
        tags: &["Crawling Manager", "Schedules"],
        source: ModuleSource::Backend,
        order: 7,
        description: "Connector sync schedules",
    },
    ModuleInfo {
        id: "oauth-provider",
        name: "OAuth Provider",
        version: "1.0.0",
        base_path: "/api/v1/oauth-clients",
        tags: &["OAuth Clients", "OAuth Provider", "OAuth Scopes"],
        source: ModuleSource::Backend,
        order: 8,
        description: "OAuth app registration and authorization server",
    },
    ModuleInfo {
        id: "mail",
        name: "Mail",
        version: "1.0.0",
        base_path: "/api/v1/mail",
        tags: &["Mail"],
        source: ModuleSource::Backend,
        order: 9,
        description: "Transactional email",
    },
    ModuleInfo {
        id: "connectors",
        name: "Connectors",
        version: "1.0.0",
        base_path: "/api/v1/connectors",
        tags: &[
            "Connectors",
            "Connector Registry",
            "Connector Instances",
            "Connector Config",
            "Connector OAuth",
            "Connector Filters",
        ],
        source: ModuleSource::Python,
        order: 10,
        description: "Connector registry, instances, configuration and OAuth",
    },
];

/// All modules in display order
pub fn all_modules() -> &'static [ModuleInfo] {
    MODULES
}

/// Find a module by id
pub fn find_module(id: &str) -> Option<&'static ModuleInfo> {
    MODULES.iter().find(|m| m.id == id)
}

/// Assign an endpoint to a module by its tags
///
/// Modules are scanned in table order; the first module owning any of the
/// tags wins. Endpoints with no matching tag belong to [`UNKNOWN_MODULE`].
pub fn classify<'a, S: AsRef<str>>(tags: &[S], modules: &'a [ModuleInfo]) -> &'a str {
    modules
        .iter()
        .find(|module| {
            tags.iter()
                .any(|tag| module.tags.contains(&tag.as_ref()))
        })
        .map_or(UNKNOWN_MODULE, |module| module.id)
}
