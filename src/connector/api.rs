//! REST client for the connector backend
//!
//! One method per endpoint under `/api/v1/connectors`. Requests are sent once;
//! a failed call surfaces the backend status and body as `Error::HttpStatus`.

use super::schema::ConnectorSchema;
use super::types::{
    AuthorizeResponse, ConfigSection, ConnectorConfig, ConnectorInfo, OAuthCallbackResponse,
    ToggleType,
};
use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::http::{path_segment, unwrap_field, HttpClient, HttpClientConfig, RequestConfig};
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

const CONNECTORS_PATH: &str = "/api/v1/connectors";

/// Persistence operations the connector editor needs
#[async_trait]
pub trait ConnectorBackend: Send + Sync {
    /// Replace the stored configuration of a connector
    async fn update_config(&self, connector: &str, config: &ConnectorConfig) -> Result<()>;
}

/// Client for the connector endpoints of the backend
#[derive(Debug, Clone)]
pub struct ConnectorApiService {
    http: HttpClient,
}

impl ConnectorApiService {
    /// Use an HTTP client pointed at the backend
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Build the client from backend settings
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Ok(Self::new(backend_http_client(config)?))
    }

    /// Underlying HTTP client, shared with the scheduling client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    fn connector_path(connector: &str, suffix: &str) -> String {
        format!("{CONNECTORS_PATH}/{}{suffix}", path_segment(connector))
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Connector types available for configuration
    pub async fn list_registry(&self) -> Result<Vec<ConnectorInfo>> {
        let body: JsonValue = self.http.get_json(&format!("{CONNECTORS_PATH}/registry")).await?;
        unwrap_field(body, "connectors")
    }

    /// Form schema of a connector type
    pub async fn get_schema(&self, connector: &str) -> Result<ConnectorSchema> {
        let path = format!("{CONNECTORS_PATH}/registry/{}/schema", path_segment(connector));
        let body: JsonValue = self.http.get_json(&path).await?;
        unwrap_field(body, "schema")
    }

    // ========================================================================
    // Instances
    // ========================================================================

    /// Configured connector instances
    pub async fn list_connectors(&self) -> Result<Vec<ConnectorInfo>> {
        let body: JsonValue = self.http.get_json(CONNECTORS_PATH).await?;
        unwrap_field(body, "connectors")
    }

    /// One connector instance
    pub async fn get_connector(&self, connector: &str) -> Result<ConnectorInfo> {
        let body: JsonValue = self
            .http
            .get_json(&Self::connector_path(connector, ""))
            .await?;
        unwrap_field(body, "connector")
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Stored configuration; `None` when the connector was never configured
    pub async fn get_config(&self, connector: &str) -> Result<Option<ConnectorConfig>> {
        let path = Self::connector_path(connector, "/config");
        let body: JsonValue = match self.http.get_json(&path).await {
            Ok(body) => body,
            Err(Error::HttpStatus { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        let config: Option<JsonValue> = unwrap_field(body, "config")?;
        match config {
            None | Some(JsonValue::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// Replace one config section
    pub async fn update_section(
        &self,
        connector: &str,
        section: ConfigSection,
        value: &JsonValue,
    ) -> Result<()> {
        let path = Self::connector_path(connector, &format!("/config/{}", section.as_str()));
        self.http
            .request(Method::PUT, &path, RequestConfig::new().json(value.clone()))
            .await?;
        debug!("Updated '{}' section of connector '{}'", section.as_str(), connector);
        Ok(())
    }

    // ========================================================================
    // OAuth
    // ========================================================================

    /// Authorization URL to start the OAuth flow
    pub async fn get_oauth_authorization_url(&self, connector: &str) -> Result<AuthorizeResponse> {
        self.http
            .get_json(&Self::connector_path(connector, "/oauth/authorize"))
            .await
    }

    /// Complete the OAuth flow with the provider's code and state
    pub async fn handle_oauth_callback(
        &self,
        connector: &str,
        code: &str,
        state: &str,
    ) -> Result<OAuthCallbackResponse> {
        self.http
            .request_json(
                Method::GET,
                &Self::connector_path(connector, "/oauth/callback"),
                RequestConfig::new().query("code", code).query("state", state),
            )
            .await
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Values available for the connector's filter fields
    pub async fn get_filter_options(&self, connector: &str) -> Result<JsonObject> {
        let body: JsonValue = self
            .http
            .get_json(&Self::connector_path(connector, "/filters"))
            .await?;
        unwrap_field(body, "filterOptions")
    }

    /// Save selected filter values
    pub async fn save_filters(&self, connector: &str, filters: &JsonObject) -> Result<()> {
        self.http
            .request(
                Method::POST,
                &Self::connector_path(connector, "/filters"),
                RequestConfig::new().json(json!({ "filters": filters })),
            )
            .await?;
        Ok(())
    }

    // ========================================================================
    // Toggles
    // ========================================================================

    /// Flip the sync or agent flag of a connector
    pub async fn toggle(&self, connector: &str, toggle: ToggleType) -> Result<()> {
        self.http
            .request(
                Method::POST,
                &Self::connector_path(connector, "/toggle"),
                RequestConfig::new().json(json!({ "type": toggle })),
            )
            .await?;
        info!("Toggled {:?} for connector '{}'", toggle, connector);
        Ok(())
    }
}

#[async_trait]
impl ConnectorBackend for ConnectorApiService {
    async fn update_config(&self, connector: &str, config: &ConnectorConfig) -> Result<()> {
        let body = serde_json::to_value(config)?;
        self.http
            .request(
                Method::PUT,
                &Self::connector_path(connector, "/config"),
                RequestConfig::new().json(body),
            )
            .await?;
        info!("Saved configuration of connector '{}'", connector);
        Ok(())
    }
}

/// HTTP client for backend calls authenticated with the admin token
pub fn backend_http_client(config: &BackendConfig) -> Result<HttpClient> {
    HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(config.url.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .bearer_token(config.token.clone())
            .build(),
    )
}
