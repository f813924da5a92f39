//! HTTP API server used by the timeline editor.
//!
//! Provides the intent endpoint plus catalog and health checks.

use crate::catalog::list_tools;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::CutlineError;
use crate::intent::IntentRequest;
use crate::orchestrator::Orchestrator;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Shared application state.
struct AppState {
    orchestrator: Orchestrator,
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<&str>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(&settings)?;

    if let Err(e) = orchestrator.provider().check_credentials() {
        Output::warning(&format!("{} Requests will fail until it is set.", e));
    }

    let app = router(orchestrator);

    let host = host.unwrap_or(settings.server.host.as_str());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Cutline API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Tools", "GET  /tools");
    Output::kv("Intent", "POST /ai");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(orchestrator: Orchestrator) -> Router {
    let state = Arc::new(AppState { orchestrator });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/tools", get(tools))
        .route("/ai", post(resolve))
        .layer(cors)
        .with_state(state)
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

fn status_for(err: &CutlineError) -> StatusCode {
    match err {
        e if e.is_client_error() => StatusCode::BAD_REQUEST,
        CutlineError::UpstreamTransport(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn tools() -> impl IntoResponse {
    let tools: Vec<_> = list_tools().iter().map(|t| t.to_json()).collect();
    Json(serde_json::json!({ "tools": tools }))
}

async fn resolve(
    State(state): State<Arc<AppState>>,
    body: Result<Json<IntentRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match state.orchestrator.handle(&request).await {
        Ok(intent) => Json(intent).into_response(),
        Err(e) => {
            let status = status_for(&e);
            warn!(status = status.as_u16(), "Request failed: {}", e);
            error_response(status, e.to_string())
        }
    }
}
