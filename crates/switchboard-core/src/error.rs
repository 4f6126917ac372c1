//! Core error types for the dispatch engine.
//!
//! Registration errors are startup-fatal and surface through `?` in the
//! application wiring. Binding and handler errors are per-request and are
//! converted into wire errors by the dispatcher (see [`crate::rpc::RpcError`]
//! and [`ResourceError`]).

use serde_json::Value;

use crate::coerce::ParamKind;

/// Misuse of the registration API. Always a programming error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Duplicate key: {0} is already registered")]
    DuplicateKey(String),

    #[error("Invalid pattern {template:?}: {reason}")]
    InvalidPattern { template: String, reason: String },

    #[error("Duplicate parameter {param:?} declared for {key}")]
    DuplicateParameter { key: String, param: String },
}

/// Failure binding wire values to a handler's declared parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoercionError {
    #[error("Missing parameter: {name}")]
    MissingParameter { name: String },

    #[error("Type mismatch for parameter {name}: expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: ParamKind,
        actual: Value,
    },
}

impl CoercionError {
    /// Structured form attached to wire errors as diagnostic `data`.
    pub fn to_data(&self) -> Value {
        match self {
            CoercionError::MissingParameter { name } => serde_json::json!({
                "kind": "missingParameter",
                "parameter": name,
                "detail": self.to_string(),
            }),
            CoercionError::TypeMismatch {
                name,
                expected,
                actual,
            } => serde_json::json!({
                "kind": "typeMismatch",
                "parameter": name,
                "expected": expected,
                "actual": actual,
                "detail": self.to_string(),
            }),
        }
    }
}

/// Explicit failure reported by a handler.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Outcome of a failed resource (path) access. Resource access has no
/// JSON-RPC envelope, so these map onto transport-level statuses.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResourceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(#[from] CoercionError),

    #[error("{0}")]
    Handler(#[from] HandlerError),
}

// ---------------------------------------------------------------------------
// axum integration (opt-in via feature flag)
// ---------------------------------------------------------------------------

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ResourceError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::response::IntoResponse;

        let status = match &self {
            ResourceError::NotFound(_) => StatusCode::NOT_FOUND,
            ResourceError::InvalidParams(_) => StatusCode::BAD_REQUEST,
            ResourceError::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
