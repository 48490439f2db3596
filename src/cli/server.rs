//! HTTP server for the unified API documentation

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::docs::{render_docs_page, ApiDocsService, DocsPageOptions};
use crate::error::{Error, Result};
use crate::types::ApiResponse;

/// App state shared across handlers
#[derive(Clone)]
pub struct AppState {
    docs: Arc<ApiDocsService>,
    page: Arc<DocsPageOptions>,
}

impl AppState {
    pub fn new(docs: Arc<ApiDocsService>) -> Self {
        Self {
            docs,
            page: Arc::new(DocsPageOptions::default()),
        }
    }

    /// Override the docs page options
    #[must_use]
    pub fn with_page(mut self, page: DocsPageOptions) -> Self {
        self.page = Arc::new(page);
        self
    }
}

/// `Error` rendered as the JSON error envelope
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ApiResponse::<()>::error(self.0.to_string()))).into_response()
    }
}

/// Build the router
pub fn router(state: AppState) -> Router {
    // Docs are public; allow any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/docs", get(docs_page))
        .route("/docs/api/unified", get(unified))
        .route("/docs/api/openapi.json", get(openapi_json))
        .route("/docs/api/modules", get(list_modules))
        .route("/docs/api/modules/:module_id", get(get_module))
        .route("/docs/api/refresh-python", post(refresh_python))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server
pub async fn serve(config: &AppConfig) -> Result<()> {
    let docs = ApiDocsService::new(config.docs.clone())?;
    docs.init().await;

    let app = router(AppState::new(Arc::new(docs)));
    let port = config.port;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting docs server on http://{}/docs", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION,
        "pythonSpecLoaded": state.docs.python_spec_loaded().await
    }))
}

async fn docs_page(State(state): State<AppState>) -> Html<String> {
    Html(render_docs_page(&state.page))
}

async fn unified(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(state.docs.unified().await))
}

/// Merged document, bare so OpenAPI tooling can consume it
async fn openapi_json(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.docs.openapi_document().await)
}

async fn list_modules(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(state.docs.modules().await))
}

async fn get_module(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let module = state.docs.module(&module_id).await?;
    Ok(Json(ApiResponse::success(module)))
}

async fn refresh_python(State(state): State<AppState>) -> Response {
    let outcome = state.docs.refresh_python_spec().await;
    if outcome.success {
        return (StatusCode::OK, Json(ApiResponse::success(outcome))).into_response();
    }

    let body = ApiResponse {
        success: false,
        error: Some(outcome.message.clone()),
        data: Some(outcome),
    };
    (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
}
