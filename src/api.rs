//! REST API server for the smart router
//!
//! Exposes the orchestrator via HTTP endpoints.
//! Integrates with the frontend UI; all routing logic stays in the core.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::orchestrator::Orchestrator;
use crate::uploads::UploadStore;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub service: Option<String>,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub orchestrator: Arc<Orchestrator>,
    pub uploads: Arc<UploadStore>,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    let stats = state.orchestrator.stats();
    Json(serde_json::json!({
        "status": "healthy",
        "agents_available": stats.available_agents.len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Chat Endpoint
/// =============================

async fn chat(
    State(state): State<ApiState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    if req.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Empty message".into())),
        );
    }

    info!("Received chat request: {}", req.message);

    // Fold uploaded-document context into the query before routing.
    let query = match state.uploads.enhance_query(&req.message).await {
        Ok(query) => query,
        Err(e) => {
            warn!(error = %e, "Document enhancement failed, using raw query");
            req.message.clone()
        }
    };

    let response = state.orchestrator.run(&query).await;

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "response": response,
            "service": req.service.unwrap_or_else(|| "all".to_string()),
        }))),
    )
}

/// =============================
/// Stats Endpoint
/// =============================

async fn stats(State(state): State<ApiState>) -> Json<ApiResponse> {
    Json(ApiResponse::success(state.orchestrator.stats()))
}

/// =============================
/// Upload Endpoints
/// =============================

async fn upload(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<ApiResponse>) {
    let mut uploaded = Vec::new();
    let mut rejected = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(format!("Malformed upload: {}", e))),
                );
            }
        };

        let Some(filename) = field.file_name().map(|n| n.to_string()) else {
            continue;
        };

        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = %filename, error = %e, "Failed to read upload field");
                rejected.push(filename);
                continue;
            }
        };

        match state.uploads.save(&filename, &bytes).await {
            Ok(stored) => uploaded.push(stored),
            Err(e) => {
                warn!(file = %filename, error = %e, "Upload rejected");
                rejected.push(filename);
            }
        }
    }

    if uploaded.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("No valid files uploaded".into())),
        );
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "uploaded_files": uploaded,
            "rejected_files": rejected,
            "message": format!("Successfully uploaded {} files", uploaded.len()),
        }))),
    )
}

async fn list_files(State(state): State<ApiState>) -> (StatusCode, Json<ApiResponse>) {
    match state.uploads.list().await {
        Ok(files) => {
            let count = files.len();
            (
                StatusCode::OK,
                Json(ApiResponse::success(serde_json::json!({
                    "files": files,
                    "count": count,
                }))),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(orchestrator: Arc<Orchestrator>, uploads: Arc<UploadStore>) -> Router {
    let state = ApiState {
        orchestrator,
        uploads,
    };

    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .route("/api/stats", get(stats))
        .route("/api/upload", post(upload))
        .route("/api/files", get(list_files))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    orchestrator: Arc<Orchestrator>,
    uploads: Arc<UploadStore>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(orchestrator, uploads);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
