//! Tests for OAuth app management

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_json() -> serde_json::Value {
    json!({
        "id": "app-1",
        "name": "Reporting",
        "clientId": "cl_123",
        "redirectUris": ["https://reports.example.com/callback"],
        "allowedGrantTypes": ["authorization_code", "refresh_token"],
        "allowedScopes": ["org:read"],
        "createdAt": "2026-01-05T10:00:00Z"
    })
}

fn service(server: &MockServer) -> OAuthApiService {
    OAuthApiService::new(
        HttpClient::with_config(HttpClientConfig::builder().base_url(server.uri()).build())
            .unwrap(),
    )
}

// ============================================================================
// Validation
// ============================================================================

#[test_case("https://app.example.com/callback", true ; "https")]
#[test_case("http://localhost:8080/callback", true ; "loopback http")]
#[test_case("http://127.0.0.1/cb", true ; "loopback ip")]
#[test_case("http://app.example.com/callback", false ; "plain http")]
#[test_case("/callback", false ; "relative")]
#[test_case("https://app.example.com/cb#frag", false ; "fragment")]
fn test_redirect_uri(uri: &str, valid: bool) {
    assert_eq!(validate_redirect_uri(uri).is_ok(), valid);
}

#[test]
fn test_create_payload_validation() {
    let ok = CreateOAuthClient::new("Reporting", vec!["https://r.example.com/cb".to_string()]);
    ok.validate().unwrap();
    assert_eq!(
        ok.allowed_grant_types,
        vec!["authorization_code", "refresh_token"]
    );

    let unnamed = CreateOAuthClient::new("  ", vec!["https://r.example.com/cb".to_string()]);
    assert!(matches!(unnamed.validate(), Err(Error::OAuth { .. })));

    let no_uris = CreateOAuthClient::new("Reporting", Vec::new());
    assert!(no_uris.validate().is_err());

    let mut bad_grant = ok.clone();
    bad_grant.allowed_grant_types = vec!["password".to_string()];
    assert!(bad_grant
        .validate()
        .unwrap_err()
        .to_string()
        .contains("password"));
}

#[test]
fn test_update_payload_validation() {
    assert!(UpdateOAuthClient::default().is_empty());
    UpdateOAuthClient {
        description: Some("new".to_string()),
        ..UpdateOAuthClient::default()
    }
    .validate()
    .unwrap();

    let bad = UpdateOAuthClient {
        redirect_uris: Some(vec!["http://evil.example.com".to_string()]),
        ..UpdateOAuthClient::default()
    };
    assert!(bad.validate().is_err());

    let body = serde_json::to_value(UpdateOAuthClient {
        is_active: Some(false),
        ..UpdateOAuthClient::default()
    })
    .unwrap();
    assert_eq!(body, json!({ "isActive": false }));
}

#[test]
fn test_credentials_debug_hides_secret() {
    let mut value = app_json();
    value["clientSecret"] = json!("s3cr3t");
    let credentials: OAuthClientCredentials = serde_json::from_value(value).unwrap();
    assert_eq!(credentials.client_secret, "s3cr3t");
    assert!(!format!("{credentials:?}").contains("s3cr3t"));
}

// ============================================================================
// API
// ============================================================================

#[tokio::test]
async fn test_list_with_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/oauth-clients"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [app_json()],
            "pagination": { "page": 2, "limit": 10, "total": 11, "totalPages": 2 }
        })))
        .mount(&server)
        .await;

    let page = service(&server).list(2, 10).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert!(page.data[0].is_active);
    assert_eq!(page.pagination.unwrap().total, 11);
}

#[tokio::test]
async fn test_create_returns_secret() {
    let server = MockServer::start().await;
    let mut created = app_json();
    created["clientSecret"] = json!("s3cr3t");
    Mock::given(method("POST"))
        .and(path("/api/v1/oauth-clients"))
        .and(body_json(json!({
            "name": "Reporting",
            "redirectUris": ["https://reports.example.com/callback"],
            "allowedGrantTypes": ["authorization_code", "refresh_token"],
            "allowedScopes": []
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "app": created })))
        .expect(1)
        .mount(&server)
        .await;

    let request = CreateOAuthClient::new(
        "Reporting",
        vec!["https://reports.example.com/callback".to_string()],
    );
    let credentials = service(&server).create(&request).await.unwrap();
    assert_eq!(credentials.client.client_id, "cl_123");
    assert_eq!(credentials.client_secret, "s3cr3t");
}

#[tokio::test]
async fn test_invalid_create_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let request = CreateOAuthClient::new("Reporting", vec!["http://insecure.example.com".into()]);
    assert!(service(&server).create(&request).await.is_err());
}

#[tokio::test]
async fn test_get_update_delete_regenerate() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/oauth-clients/app-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "app": app_json() })))
        .mount(&server)
        .await;
    let mut renamed = app_json();
    renamed["name"] = json!("Reports");
    Mock::given(method("PUT"))
        .and(path("/api/v1/oauth-clients/app-1"))
        .and(body_json(json!({ "name": "Reports" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "app": renamed })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/oauth-clients/app-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let mut regenerated = app_json();
    regenerated["clientSecret"] = json!("n3w");
    Mock::given(method("POST"))
        .and(path("/api/v1/oauth-clients/app-1/regenerate-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(regenerated))
        .mount(&server)
        .await;

    let api = service(&server);
    assert_eq!(api.get("app-1").await.unwrap().name, "Reporting");

    let update = UpdateOAuthClient {
        name: Some("Reports".to_string()),
        ..UpdateOAuthClient::default()
    };
    assert_eq!(api.update("app-1", &update).await.unwrap().name, "Reports");
    assert!(api
        .update("app-1", &UpdateOAuthClient::default())
        .await
        .is_err());

    api.delete("app-1").await.unwrap();
    assert_eq!(
        api.regenerate_secret("app-1").await.unwrap().client_secret,
        "n3w"
    );
}

#[tokio::test]
async fn test_list_scopes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/oauth/scopes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "scopes": [
                { "name": "org:read", "description": "Read organization", "category": "Organization" },
                { "name": "kb:write", "description": "Write knowledge bases" }
            ]
        })))
        .mount(&server)
        .await;

    let scopes = service(&server).list_scopes().await.unwrap();
    assert_eq!(scopes.len(), 2);
    assert_eq!(scopes[1].category, None);
}
