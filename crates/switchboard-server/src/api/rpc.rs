//! JSON-RPC 2.0 endpoint powered by `switchboard_core::Dispatcher`.
//!
//! Exposes `POST /api/rpc`: a single endpoint for all JSON-RPC method calls.
//! Also exposes `GET /api/rpc/methods` for method discovery.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use switchboard_core::rpc::{codec, types::INTERNAL_ERROR, JsonRpcResponse};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(rpc_handler))
        .route("/methods", get(list_methods))
}

/// POST /api/rpc: JSON-RPC 2.0 endpoint.
///
/// The body is handed over as raw bytes so that malformed JSON is reported
/// as a JSON-RPC parse error rather than rejected by an extractor.
/// Notifications are answered with `204 No Content` and an empty body.
async fn rpc_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match codec::decode(&body) {
        Ok(request) => request,
        Err(err) => return json_response(&err.into_error_response()),
    };

    let id = request.id.clone();
    let method = request.method.clone();
    let dispatcher = state.dispatcher.clone();
    let task = tokio::task::spawn_blocking(move || dispatcher.handle(request));

    let response = match tokio::time::timeout(state.request_timeout, task).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            tracing::error!(method = %method, "Dispatch task failed: {}", e);
            id.map(|id| JsonRpcResponse::error(Some(id), INTERNAL_ERROR, "Internal error"))
        }
        Err(_) => {
            tracing::warn!(
                method = %method,
                timeout_ms = state.request_timeout.as_millis() as u64,
                "Request timed out"
            );
            id.map(|id| JsonRpcResponse::error(Some(id), INTERNAL_ERROR, "Request timed out"))
        }
    };

    match response {
        Some(response) => json_response(&response),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

fn json_response(response: &JsonRpcResponse) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        codec::encode(response),
    )
        .into_response()
}

/// GET /api/rpc/methods: list registered methods and resources.
async fn list_methods(State(state): State<AppState>) -> Json<serde_json::Value> {
    let registry = state.dispatcher.registry();
    Json(serde_json::json!({
        "methods": registry.methods(),
        "resources": registry.resources(),
    }))
}
