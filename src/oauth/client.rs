//! REST client for OAuth app management

use super::types::{
    CreateOAuthClient, OAuthClient, OAuthClientCredentials, OAuthClientPage, OAuthScope,
    UpdateOAuthClient,
};
use crate::error::{Error, Result};
use crate::http::{path_segment, unwrap_field, HttpClient, RequestConfig};
use crate::types::JsonValue;
use reqwest::Method;
use tracing::info;

const CLIENTS_PATH: &str = "/api/v1/oauth-clients";
const SCOPES_PATH: &str = "/api/v1/oauth/scopes";

/// Client for `/api/v1/oauth-clients`
#[derive(Debug, Clone)]
pub struct OAuthApiService {
    http: HttpClient,
}

impl OAuthApiService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn client_path(id: &str, suffix: &str) -> String {
        format!("{CLIENTS_PATH}/{}{suffix}", path_segment(id))
    }

    /// One page of registered apps
    pub async fn list(&self, page: u32, limit: u32) -> Result<OAuthClientPage> {
        self.http
            .request_json(
                Method::GET,
                CLIENTS_PATH,
                RequestConfig::new()
                    .query("page", page.to_string())
                    .query("limit", limit.to_string()),
            )
            .await
    }

    pub async fn get(&self, id: &str) -> Result<OAuthClient> {
        let body: JsonValue = self.http.get_json(&Self::client_path(id, "")).await?;
        unwrap_field(body, "app")
    }

    /// Register an app; the response carries the only copy of the secret
    pub async fn create(&self, request: &CreateOAuthClient) -> Result<OAuthClientCredentials> {
        request.validate()?;
        let body: JsonValue = self
            .http
            .send_json(Method::POST, CLIENTS_PATH, request)
            .await?;
        let created: OAuthClientCredentials = unwrap_field(body, "app")?;
        info!(
            "Registered OAuth app '{}' ({})",
            created.client.name, created.client.client_id
        );
        Ok(created)
    }

    pub async fn update(&self, id: &str, request: &UpdateOAuthClient) -> Result<OAuthClient> {
        if request.is_empty() {
            return Err(Error::oauth("update contains no changes"));
        }
        request.validate()?;
        let body: JsonValue = self
            .http
            .send_json(Method::PUT, &Self::client_path(id, ""), request)
            .await?;
        unwrap_field(body, "app")
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.http.delete(&Self::client_path(id, "")).await?;
        info!("Deleted OAuth app {}", id);
        Ok(())
    }

    /// Issue a new secret; the previous one stops working
    pub async fn regenerate_secret(&self, id: &str) -> Result<OAuthClientCredentials> {
        let body: JsonValue = self
            .http
            .request_json(
                Method::POST,
                &Self::client_path(id, "/regenerate-secret"),
                RequestConfig::new(),
            )
            .await?;
        let regenerated = unwrap_field(body, "app")?;
        info!("Regenerated secret of OAuth app {}", id);
        Ok(regenerated)
    }

    /// Scopes apps may request
    pub async fn list_scopes(&self) -> Result<Vec<OAuthScope>> {
        let body: JsonValue = self.http.get_json(SCOPES_PATH).await?;
        unwrap_field(body, "scopes")
    }
}
