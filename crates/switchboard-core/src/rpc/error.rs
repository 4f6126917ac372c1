//! RPC error type that bridges engine failures to JSON-RPC errors.

use serde_json::Value;

use super::codec::DecodeError;
use super::types::{self, JsonRpcResponse};
use crate::error::{CoercionError, HandlerError};

/// Which code parameter-binding failures are reported with.
///
/// `Conflated` reports them as `-32603` (Internal error), sharing the code
/// with handler failures. `Strict` uses the reserved `-32602` (Invalid
/// params).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamErrorPolicy {
    #[default]
    Conflated,
    Strict,
}

/// Unified RPC error that can be converted to a JSON-RPC error response.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Parse error")]
    Parse(String),

    #[error("Invalid Request")]
    InvalidRequest(String),

    #[error("Method not found")]
    MethodNotFound(String),

    #[error("{0}")]
    InvalidParams(CoercionError, ParamErrorPolicy),

    #[error("{0}")]
    Handler(HandlerError),
}

impl RpcError {
    /// Convert to a JSON-RPC error code.
    pub fn code(&self) -> i64 {
        match self {
            RpcError::Parse(_) => types::PARSE_ERROR,
            RpcError::InvalidRequest(_) => types::INVALID_REQUEST,
            RpcError::MethodNotFound(_) => types::METHOD_NOT_FOUND,
            RpcError::InvalidParams(_, ParamErrorPolicy::Strict) => types::INVALID_PARAMS,
            RpcError::InvalidParams(_, ParamErrorPolicy::Conflated) => types::INTERNAL_ERROR,
            RpcError::Handler(_) => types::INTERNAL_ERROR,
        }
    }

    /// Diagnostic payload attached as the error's `data` member.
    pub fn data(&self) -> Option<Value> {
        match self {
            RpcError::Parse(detail)
            | RpcError::InvalidRequest(detail)
            | RpcError::MethodNotFound(detail) => Some(Value::String(detail.clone())),
            RpcError::InvalidParams(err, _) => Some(err.to_data()),
            RpcError::Handler(_) => None,
        }
    }

    /// The error object's `message`. Binding failures use the generic text
    /// for their code and keep the specifics in `data`.
    pub fn message(&self) -> String {
        match self {
            RpcError::InvalidParams(_, ParamErrorPolicy::Strict) => "Invalid params".into(),
            RpcError::InvalidParams(_, ParamErrorPolicy::Conflated) => "Internal error".into(),
            other => other.to_string(),
        }
    }

    /// Convert to a JSON-RPC error response.
    pub fn to_response(&self, id: Option<Value>) -> JsonRpcResponse {
        match self.data() {
            Some(data) => JsonRpcResponse::error_with_data(id, self.code(), self.message(), data),
            None => JsonRpcResponse::error(id, self.code(), self.message()),
        }
    }
}

impl From<DecodeError> for RpcError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Parse(e) => RpcError::Parse(e.to_string()),
            DecodeError::InvalidRequest { reason, .. } => RpcError::InvalidRequest(reason),
        }
    }
}

impl From<HandlerError> for RpcError {
    fn from(err: HandlerError) -> Self {
        RpcError::Handler(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::ParamKind;
    use serde_json::json;

    fn mismatch() -> CoercionError {
        CoercionError::TypeMismatch {
            name: "a".into(),
            expected: ParamKind::Integer,
            actual: json!("x"),
        }
    }

    #[test]
    fn binding_failure_code_follows_policy() {
        assert_eq!(
            RpcError::InvalidParams(mismatch(), ParamErrorPolicy::Conflated).code(),
            -32603
        );
        assert_eq!(
            RpcError::InvalidParams(mismatch(), ParamErrorPolicy::Strict).code(),
            -32602
        );
    }

    #[test]
    fn handler_error_message_becomes_error_text() {
        let resp = RpcError::Handler(HandlerError::new("division by zero")).to_response(Some(json!(1)));
        let error = resp.error.unwrap();
        assert_eq!(error.code, -32603);
        assert_eq!(error.message, "division by zero");
        assert_eq!(error.data, None);
    }

    #[test]
    fn binding_failure_carries_structured_data() {
        let resp = RpcError::InvalidParams(mismatch(), ParamErrorPolicy::Conflated).to_response(None);
        let error = resp.error.unwrap();
        let data = error.data.unwrap();
        assert_eq!(error.message, "Internal error");
        assert_eq!(data["kind"], "typeMismatch");
        assert_eq!(data["parameter"], "a");
        assert_eq!(data["expected"], "integer");
        assert_eq!(data["actual"], "x");
    }
}
