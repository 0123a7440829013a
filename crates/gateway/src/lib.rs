//! HTTP API gateway for cxbot.
//!
//! Endpoints:
//!
//! - `POST /chat`   `{user_id, message, lat, lon}` → `{answer}`
//! - `GET  /health` liveness plus index size
//!
//! Built on Axum. Browser clients from the configured origins may call the
//! API with credentials.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderValue;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

use cxbot_agent::{ChatRequest, ChatResponse, Orchestrator};
use cxbot_core::{Error, ToolError};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub orchestrator: Orchestrator,
}

type SharedState = Arc<GatewayState>;

/// Gateway startup errors.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Invalid CORS origin '{0}'")]
    InvalidOrigin(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - CORS for `allowed_origins`, with credentials
/// - Request body size limit (64 KB)
/// - HTTP trace logging
pub fn build_router(state: SharedState, allowed_origins: &[String]) -> Result<Router, GatewayError> {
    let cors = build_cors(allowed_origins)?;

    Ok(Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http()))
}

/// CORS policy: exact origins, credentials allowed, any method and header.
///
/// Methods and headers mirror the preflight request because wildcards are
/// not permitted together with credentials.
fn build_cors(allowed_origins: &[String]) -> Result<CorsLayer, GatewayError> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| GatewayError::InvalidOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Start the gateway HTTP server and run until Ctrl-C.
pub async fn start(
    orchestrator: Orchestrator,
    config: &cxbot_config::GatewayConfig,
) -> Result<(), GatewayError> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(GatewayState { orchestrator });
    let app = build_router(state, &config.allowed_origins)?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| GatewayError::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!(addr = %addr, origins = ?config.allowed_origins, "Gateway listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
}

/// HTTP status for a failed request.
pub fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::MalformedInput(_) | Error::Tool(ToolError::InvalidArguments(_)) => {
            StatusCode::BAD_REQUEST
        }
        Error::Index(_) => StatusCode::SERVICE_UNAVAILABLE,
        Error::Provider(_) => StatusCode::BAD_GATEWAY,
        Error::Config { .. } | Error::Serialization(_) | Error::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(err: &Error) -> ApiError {
    let status = status_for(err);
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        "Internal server error".to_string()
    } else {
        err.to_string()
    };
    (status, Json(ErrorResponse { error: message }))
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    chunks: usize,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        chunks: state.orchestrator.retriever().store().len(),
    })
}

async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected chat request body");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Malformed input: {}", rejection.body_text()),
            }),
        )
    })?;

    match state.orchestrator.handle(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            let (status, body) = error_response(&e);
            if status.is_server_error() {
                error!(status = status.as_u16(), error = %e, "Chat request failed");
            }
            Err((status, body))
        }
    }
}
