//! Application startup and lifecycle management.

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::error::AppError;
use crate::handlers;
use crate::middleware::{REQUEST_ID_HEADER, metrics_middleware, request_id_middleware};
use crate::services::{CompletionClient, get_metrics, init_metrics};

/// Request bodies above this many bytes are rejected before any handler runs.
const MAX_JSON_BODY_BYTES: usize = 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub completion: CompletionClient,
}

/// Liveness probe. Fixed payload no matter how the relay is configured.
async fn health_check() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// Prometheus metrics endpoint.
async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: Config) -> Result<Self, AppError> {
        init_metrics();

        let completion = CompletionClient::new(config.upstream.clone());
        if completion.is_configured() {
            tracing::info!(
                model = %config.upstream.model,
                base_url = %config.upstream.base_url,
                "Completion client initialized"
            );
        } else {
            tracing::warn!(
                "AI_API_KEY not set - relay endpoints will answer with configuration errors"
            );
        }

        let state = AppState { config, completion };

        // Bind the listener up front (port 0 = random port for testing)
        let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Relay listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router).await
    }
}

fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/healthz", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/status", get(handlers::status::status))
        .route("/api/ai-recommend", post(handlers::recommend::recommend))
        .route("/api/ai-chat", post(handlers::chat::chat))
        // Anything unmatched falls through to the bundled web client
        .fallback_service(ServeDir::new(&static_dir))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_JSON_BODY_BYTES))
        // Add metrics middleware
        .layer(from_fn(metrics_middleware))
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        // Add CORS layer
        .layer(cors)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ]);

    if origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Ignoring it.", origin, e);
                None
            }
        })
        .collect();

    cors.allow_origin(allowed)
}
