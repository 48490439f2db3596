//! Unified API documentation
//!
//! Merges the backend's static OpenAPI document with the document served by
//! the Python connector service, classifies every operation into a module
//! and renders the docs viewer.
//!
//! # Overview
//!
//! - `ApiDocsService` - loads, fetches, merges and caches documents
//! - `merge_documents` - path/component/tag merge with clash handling
//! - `classify` - tag-based module assignment
//! - `render_docs_page` - the HTML viewer

mod html;
mod modules;
mod openapi;
mod service;

pub use html::{render_docs_page, DocsPageOptions};
pub use modules::{all_modules, classify, find_module, ModuleInfo, MODULES, UNKNOWN_MODULE};
pub use openapi::{
    extract_endpoints, merge_documents, Components, EndpointInfo, MergedSpec, OpenApiDocument,
    Tag, PYTHON_COMPONENT_PREFIX,
};
pub use service::{
    load_document, ApiDocsService, ModuleDetail, ModuleSummary, RefreshOutcome, SpecSource,
    UnifiedDocs,
};


#[cfg(test)]
mod service_tests;
