//! Request handlers for the gateway endpoints.

use std::time::Instant;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::gatekeeper::{ChatMessage, GatewayError};
use crate::http::server::AppState;
use crate::observability::metrics;

/// Fallback identity when the caller sends no `x-user-id` header.
const ANONYMOUS_TOKEN: &str = "anonymous";

/// Body of `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Success body: either a model reply or the canned redirect.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub content: String,
}

/// Body of `GET /health`.
#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// `POST /chat` — run the gatekeeping pipeline for one message.
pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, GatewayError> {
    let start = Instant::now();
    let token = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or(ANONYMOUS_TOKEN)
        .to_string();

    tracing::debug!(
        client = %token,
        messages = request.messages.len(),
        "Handling chat request"
    );

    match state.gatekeeper.handle(&request.messages, &token).await {
        Ok(outcome) => {
            metrics::record_request(outcome.label(), start);
            Ok(Json(ChatResponse {
                content: outcome.into_content(),
            }))
        }
        Err(error) => {
            metrics::record_request(error.label(), start);
            Err(error)
        }
    }
}

/// `GET /health` — liveness probe.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
