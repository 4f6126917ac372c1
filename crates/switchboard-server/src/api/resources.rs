//! Resource access by path template.
//!
//! Every `GET` that no other route claims is matched against the registered
//! templates. A match answers `{"result": value}` with no JSON-RPC envelope;
//! failures map onto plain HTTP statuses (see `ResourceError`).

use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use switchboard_core::ResourceError;

use crate::state::AppState;

pub async fn resource_handler(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let path = match urlencoding::decode(uri.path()) {
        Ok(path) => path.into_owned(),
        Err(_) => return ResourceError::NotFound(uri.path().to_string()).into_response(),
    };

    if method != Method::GET {
        return ResourceError::NotFound(path).into_response();
    }

    let dispatcher = state.dispatcher.clone();
    let task = {
        let path = path.clone();
        tokio::task::spawn_blocking(move || dispatcher.handle_resource(&path))
    };

    match tokio::time::timeout(state.request_timeout, task).await {
        Ok(Ok(Ok(value))) => Json(serde_json::json!({ "result": value })).into_response(),
        Ok(Ok(Err(err))) => {
            if !matches!(err, ResourceError::NotFound(_)) {
                tracing::debug!(path = %path, "Resource call failed: {}", err);
            }
            err.into_response()
        }
        Ok(Err(e)) => {
            tracing::error!(path = %path, "Resource task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Internal error" })),
            )
                .into_response()
        }
        Err(_) => {
            tracing::warn!(path = %path, "Resource request timed out");
            (
                StatusCode::GATEWAY_TIMEOUT,
                Json(serde_json::json!({ "error": "Request timed out" })),
            )
                .into_response()
        }
    }
}
