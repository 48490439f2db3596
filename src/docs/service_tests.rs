//! Tests for ApiDocsService

use super::*;
use crate::config::DocsConfig;
use crate::error::Error;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BACKEND_YAML: &str = r"
openapi: 3.0.0
info:
  title: PipesHub API
  version: 1.0.0
paths:
  /api/v1/users:
    get:
      tags: [Users]
      summary: List users
  /api/v1/mail/send:
    post:
      tags: [Mail]
      summary: Send mail
components:
  schemas:
    Error:
      type: object
";

fn python_spec() -> serde_json::Value {
    json!({
        "openapi": "3.1.0",
        "info": { "title": "Connectors", "version": "0.1.0" },
        "paths": {
            "/api/v1/connectors": {
                "get": { "tags": ["Connector Instances"], "summary": "List connectors" }
            },
            "/api/v1/connectors/{connector}/config": {
                "get": { "tags": ["Connector Config"] },
                "put": { "tags": ["Connector Config"] }
            }
        },
        "components": { "schemas": { "Error": { "type": "string" } } }
    })
}

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn docs_config(spec: &NamedTempFile, python_url: &str, fallback: Option<PathBuf>) -> DocsConfig {
    DocsConfig {
        spec_path: spec.path().to_path_buf(),
        python_url: python_url.to_string(),
        python_fallback_path: fallback,
        python_timeout_secs: 5,
    }
}

async fn python_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openapi.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(python_spec()))
        .mount(&server)
        .await;
    server
}

/// An address nothing listens on
fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[test]
fn test_missing_backend_spec_is_fatal() {
    let config = DocsConfig {
        spec_path: PathBuf::from("/nonexistent/pipeshub-openapi.yaml"),
        ..DocsConfig::default()
    };
    let err = ApiDocsService::new(config).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[tokio::test]
async fn test_backend_only_before_init() {
    let spec = write_temp(BACKEND_YAML);
    let service = ApiDocsService::new(docs_config(&spec, &unreachable_url(), None)).unwrap();

    assert!(!service.python_spec_loaded().await);
    let endpoints = service.endpoints().await;
    assert_eq!(endpoints.len(), 2);

    let modules = service.modules().await;
    let connectors = modules.iter().find(|m| m.info.id == "connectors").unwrap();
    assert!(!connectors.available);
    assert_eq!(connectors.endpoint_count, 0);
}

#[tokio::test]
async fn test_init_fetches_remote_spec() {
    let spec = write_temp(BACKEND_YAML);
    let server = python_server().await;
    let service = ApiDocsService::new(docs_config(&spec, &server.uri(), None)).unwrap();

    let outcome = service.init().await;
    assert!(outcome.success);
    assert_eq!(outcome.source, Some(SpecSource::Remote));

    let unified = service.unified().await;
    assert!(unified.python_spec_loaded);
    assert_eq!(unified.endpoints.len(), 5);
    assert!(unified
        .spec
        .components
        .schemas()
        .unwrap()
        .contains_key("PythonError"));

    let connectors = service.module("connectors").await.unwrap();
    assert_eq!(connectors.summary.endpoint_count, 3);
    assert!(connectors.summary.available);
    assert!(connectors
        .endpoints
        .iter()
        .all(|e| e.source == crate::types::ModuleSource::Python));
}

#[tokio::test]
async fn test_refresh_falls_back_to_local_file() {
    let spec = write_temp(BACKEND_YAML);
    let fallback = write_temp(&python_spec().to_string());
    let service = ApiDocsService::new(docs_config(
        &spec,
        &unreachable_url(),
        Some(fallback.path().to_path_buf()),
    ))
    .unwrap();

    let outcome = service.refresh_python_spec().await;
    assert!(outcome.success);
    assert_eq!(outcome.source, Some(SpecSource::LocalFile));
    assert!(service.python_spec_loaded().await);
}

#[tokio::test]
async fn test_refresh_failure_keeps_cached_spec() {
    let spec = write_temp(BACKEND_YAML);
    let server = python_server().await;
    let service = ApiDocsService::new(docs_config(&spec, &server.uri(), None)).unwrap();
    assert!(service.init().await.success);
    let before = service.merged_spec().await;

    // Python service goes away
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/openapi.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let outcome = service.refresh_python_spec().await;
    assert!(!outcome.success);
    assert!(outcome.source.is_none());
    assert!(outcome.python_spec_loaded);

    let after = service.merged_spec().await;
    assert_eq!(*before, *after);
}

#[tokio::test]
async fn test_refresh_unreachable_without_fallback() {
    let spec = write_temp(BACKEND_YAML);
    let service = ApiDocsService::new(docs_config(&spec, &unreachable_url(), None)).unwrap();

    let outcome = service.init().await;
    assert!(!outcome.success);
    assert!(!outcome.python_spec_loaded);
    assert!(outcome.message.contains("fallback"));
    assert_eq!(service.endpoints().await.len(), 2);
}

#[tokio::test]
async fn test_invalid_remote_spec_is_rejected() {
    let spec = write_temp(BACKEND_YAML);
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openapi.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{ broken"))
        .mount(&server)
        .await;

    let service = ApiDocsService::new(docs_config(&spec, &server.uri(), None)).unwrap();
    assert!(service.fetch_python_spec().await.is_err());
    assert!(!service.refresh_python_spec().await.success);
}

#[tokio::test]
async fn test_unknown_module() {
    let spec = write_temp(BACKEND_YAML);
    let service = ApiDocsService::new(docs_config(&spec, &unreachable_url(), None)).unwrap();

    let err = service.module("billing").await.unwrap_err();
    assert!(matches!(err, Error::ModuleNotFound { .. }));
}
