//! HTTP front end — a health probe and a chat endpoint.
//!
//! Endpoints:
//! - `GET /health`: liveness probe for container schedulers
//! - `POST /chat`: route one `{"message": …}` request through the orchestrator
//!
//! One orchestrator carries one conversation, so the router wraps it in an
//! async mutex and requests are serialized. The orchestrator never fails
//! outward, which keeps the endpoint surface to 200s and 400s.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::agent_core::Orchestrator;

// ─── Wire Types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatError {
    error: String,
}

/// Shared state behind the chat endpoint: one orchestrator, one conversation.
#[derive(Clone)]
struct ChatState {
    orchestrator: Arc<Mutex<Orchestrator>>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the HTTP router around one orchestrator.
pub fn router(orchestrator: Orchestrator) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .with_state(ChatState {
            orchestrator: Arc::new(Mutex::new(orchestrator)),
        })
}

/// Bind and serve until a shutdown signal arrives.
pub async fn serve(host: &str, port: u16, orchestrator: Orchestrator) -> std::io::Result<()> {
    let address = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(bind_address = %address, "chat server listening");

    axum::serve(listener, router(orchestrator))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!("ctrl-c handler unavailable, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            message: "Service is running",
        }),
    )
}

async fn chat(State(state): State<ChatState>, body: String) -> Response {
    let Some(message) = extract_message(&body) else {
        tracing::warn!("chat request without a usable 'message' field");
        return (
            StatusCode::BAD_REQUEST,
            Json(ChatError {
                error: "Invalid request. Please provide a 'message' field.".to_string(),
            }),
        )
            .into_response();
    };

    let mut orchestrator = state.orchestrator.lock().await;
    let envelope = orchestrator.route(&message).await;
    (StatusCode::OK, Json(envelope)).into_response()
}

/// Pull a non-empty `message` string out of a JSON request body.
fn extract_message(body: &str) -> Option<String> {
    let data: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = data.get("message")?.as_str()?.trim();
    (!message.is_empty()).then(|| message.to_string())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
