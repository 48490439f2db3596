//! Documentation aggregation service
//!
//! Loads the backend OpenAPI document at startup, fetches the Python
//! connector service's document and keeps the merged result in memory.
//! The merged spec only changes on an explicit refresh.

use super::modules::{all_modules, find_module, ModuleInfo};
use super::openapi::{
    extract_endpoints, merge_documents, EndpointInfo, MergedSpec, OpenApiDocument,
    PYTHON_COMPONENT_PREFIX,
};
use crate::config::DocsConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::types::ModuleSource;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Where the current Python document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecSource {
    /// Fetched from the running Python service
    Remote,
    /// Read from the local fallback file
    LocalFile,
}

/// Outcome of a Python spec refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SpecSource>,
    pub python_spec_loaded: bool,
    pub message: String,
}

/// Module with its endpoint count
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    #[serde(flatten)]
    pub info: ModuleInfo,
    pub endpoint_count: usize,
    pub available: bool,
}

/// Module with its endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDetail {
    #[serde(flatten)]
    pub summary: ModuleSummary,
    pub endpoints: Vec<EndpointInfo>,
}

/// Everything the docs viewer needs in one payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedDocs {
    pub modules: Vec<ModuleSummary>,
    pub endpoints: Vec<EndpointInfo>,
    pub spec: OpenApiDocument,
    pub python_spec_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_spec_source: Option<SpecSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_spec_loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct DocsState {
    python: Option<OpenApiDocument>,
    python_source: Option<SpecSource>,
    python_loaded_at: Option<DateTime<Utc>>,
    merged: Arc<MergedSpec>,
}

/// Unified API documentation service
#[derive(Debug)]
pub struct ApiDocsService {
    config: DocsConfig,
    client: HttpClient,
    backend: OpenApiDocument,
    modules: &'static [ModuleInfo],
    state: RwLock<DocsState>,
}

impl ApiDocsService {
    /// Load the backend document; a missing file is fatal
    pub fn new(config: DocsConfig) -> Result<Self> {
        let backend = load_document(&config.spec_path)?;
        info!(
            "Loaded backend OpenAPI document from {} ({} operations)",
            config.spec_path.display(),
            backend.operation_count()
        );

        let client = HttpClient::with_config(
            HttpClientConfig::builder()
                .base_url(config.python_url.clone())
                .timeout(config.python_timeout())
                .build(),
        )?;

        let state = DocsState {
            python: None,
            python_source: None,
            python_loaded_at: None,
            merged: Arc::new(MergedSpec::single(backend.clone())),
        };

        Ok(Self {
            config,
            client,
            backend,
            modules: all_modules(),
            state: RwLock::new(state),
        })
    }

    /// Load the Python document; failure leaves the service in backend-only mode
    pub async fn init(&self) -> RefreshOutcome {
        let outcome = self.refresh_python_spec().await;
        if !outcome.success {
            warn!(
                "Starting without Python connector docs: {}",
                outcome.message
            );
        }
        outcome
    }

    /// Fetch `/openapi.json` from the Python service
    pub async fn fetch_python_spec(&self) -> Result<OpenApiDocument> {
        let response = self
            .client
            .get_with_config(
                "/openapi.json",
                RequestConfig::new().timeout(self.config.python_timeout()),
            )
            .await?;
        let text = response.text().await?;
        OpenApiDocument::parse(&text)
    }

    /// Read the configured local copy of the Python document
    pub fn load_python_fallback(&self) -> Result<OpenApiDocument> {
        let path = self
            .config
            .python_fallback_path
            .as_ref()
            .ok_or_else(|| Error::PythonSpecUnavailable {
                message: "no local fallback file configured".to_string(),
            })?;
        load_document(path)
    }

    /// Re-fetch the Python document (remote first, then local file)
    ///
    /// When both sources fail the cached document is kept and the outcome
    /// reports `success: false`.
    pub async fn refresh_python_spec(&self) -> RefreshOutcome {
        let remote_error = match self.fetch_python_spec().await {
            Ok(doc) => return self.install_python_spec(doc, SpecSource::Remote).await,
            Err(e) => {
                warn!(
                    "Failed to fetch Python OpenAPI spec from {}: {}",
                    self.config.python_url, e
                );
                e
            }
        };

        match self.load_python_fallback() {
            Ok(doc) => self.install_python_spec(doc, SpecSource::LocalFile).await,
            Err(fallback_error) => {
                warn!("Python OpenAPI fallback unavailable: {}", fallback_error);
                let loaded = self.state.read().await.python.is_some();
                RefreshOutcome {
                    success: false,
                    source: None,
                    python_spec_loaded: loaded,
                    message: format!(
                        "remote fetch failed ({remote_error}); fallback failed ({fallback_error})"
                    ),
                }
            }
        }
    }

    async fn install_python_spec(
        &self,
        python: OpenApiDocument,
        source: SpecSource,
    ) -> RefreshOutcome {
        let merged = merge_documents(&self.backend, &python, PYTHON_COMPONENT_PREFIX);
        let operations = python.operation_count();
        if !merged.renamed_components.is_empty() {
            info!(
                "Renamed {} clashing Python components",
                merged.renamed_components.len()
            );
        }

        let mut state = self.state.write().await;
        state.python = Some(python);
        state.python_source = Some(source);
        state.python_loaded_at = Some(Utc::now());
        state.merged = Arc::new(merged);

        info!("Loaded Python OpenAPI spec ({operations} operations, {source:?})");
        RefreshOutcome {
            success: true,
            source: Some(source),
            python_spec_loaded: true,
            message: format!("Python spec loaded with {operations} operations"),
        }
    }

    /// Snapshot of the merged spec
    pub async fn merged_spec(&self) -> Arc<MergedSpec> {
        Arc::clone(&self.state.read().await.merged)
    }

    /// The merged OpenAPI document
    pub async fn openapi_document(&self) -> OpenApiDocument {
        self.merged_spec().await.document.clone()
    }

    /// Whether a Python document is currently merged in
    pub async fn python_spec_loaded(&self) -> bool {
        self.state.read().await.python.is_some()
    }

    /// Every operation, classified into modules
    pub async fn endpoints(&self) -> Vec<EndpointInfo> {
        let merged = self.merged_spec().await;
        extract_endpoints(&merged, self.modules)
    }

    /// Module table with endpoint counts
    pub async fn modules(&self) -> Vec<ModuleSummary> {
        let endpoints = self.endpoints().await;
        let python_loaded = self.python_spec_loaded().await;
        self.summaries(&endpoints, python_loaded)
    }

    /// One module and its endpoints
    pub async fn module(&self, id: &str) -> Result<ModuleDetail> {
        let info = find_module(id).ok_or_else(|| Error::ModuleNotFound {
            module: id.to_string(),
        })?;
        let python_loaded = self.python_spec_loaded().await;
        let endpoints: Vec<EndpointInfo> = self
            .endpoints()
            .await
            .into_iter()
            .filter(|e| e.module_id == info.id)
            .collect();

        Ok(ModuleDetail {
            summary: ModuleSummary {
                info: info.clone(),
                endpoint_count: endpoints.len(),
                available: is_available(info, python_loaded),
            },
            endpoints,
        })
    }

    /// Modules, endpoints and spec in one payload
    pub async fn unified(&self) -> UnifiedDocs {
        let (merged, python_loaded, source, loaded_at) = {
            let state = self.state.read().await;
            (
                Arc::clone(&state.merged),
                state.python.is_some(),
                state.python_source,
                state.python_loaded_at,
            )
        };
        let endpoints = extract_endpoints(&merged, self.modules);

        UnifiedDocs {
            modules: self.summaries(&endpoints, python_loaded),
            endpoints,
            spec: merged.document.clone(),
            python_spec_loaded: python_loaded,
            python_spec_source: source,
            python_spec_loaded_at: loaded_at,
        }
    }

    fn summaries(&self, endpoints: &[EndpointInfo], python_loaded: bool) -> Vec<ModuleSummary> {
        self.modules
            .iter()
            .map(|info| ModuleSummary {
                info: info.clone(),
                endpoint_count: endpoints.iter().filter(|e| e.module_id == info.id).count(),
                available: is_available(info, python_loaded),
            })
            .collect()
    }
}

fn is_available(info: &ModuleInfo, python_loaded: bool) -> bool {
    info.source == ModuleSource::Backend || python_loaded
}

/// Read and parse an OpenAPI document from disk
pub fn load_document(path: &Path) -> Result<OpenApiDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path.display().to_string())
        } else {
            Error::Io(e)
        }
    })?;
    OpenApiDocument::parse(&content)
}
