//! JSON-RPC 2.0 envelope types.
//!
//! These types are defined standalone (not tied to axum or any HTTP framework)
//! so they can be serialized/deserialized in any transport context.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The only protocol version tag accepted on the wire.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Must be "2.0". Kept optional so a missing tag is reported as an
    /// invalid request rather than a parse error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    /// Request identifier. `None` only when the field is absent, which marks
    /// a notification; an explicit `null` is `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
    /// Method name, e.g. `"add"`.
    pub method: String,
    /// Named (object) or positional (array) parameters. May be omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 response. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: String,
    /// Echoed from the request, `null` when it could not be read.
    #[serde(default)]
    pub id: Value,
    /// Result on success. A `null` result is still a result.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    /// Error on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code.
    pub code: i64,
    /// Short description.
    pub message: String,
    /// Optional diagnostic data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

// ---------------------------------------------------------------------------
// Standard JSON-RPC 2.0 error codes
// ---------------------------------------------------------------------------

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

impl JsonRpcRequest {
    /// Build a request carrying an identifier.
    pub fn new(id: Value, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.into()),
            id: Some(id),
            method: method.into(),
            params,
        }
    }

    /// Build a notification (no identifier, no response expected).
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.into()),
            id: None,
            method: method.into(),
            params,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

impl JsonRpcResponse {
    /// Build a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            id: id.unwrap_or(Value::Null),
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response.
    pub fn error(id: Option<Value>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            id: id.unwrap_or(Value::Null),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Build an error response with additional data.
    pub fn error_with_data(
        id: Option<Value>,
        code: i64,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            id: id.unwrap_or(Value::Null),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: Some(data),
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Distinguishes a present-but-null field from an absent one.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_id_is_a_notification_but_null_id_is_not() {
        let absent: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "method": "ping"})).unwrap();
        assert!(absent.is_notification());

        let null: JsonRpcRequest =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": null, "method": "ping"}))
                .unwrap();
        assert_eq!(null.id, Some(Value::Null));
        assert!(!null.is_notification());
    }

    #[test]
    fn success_response_omits_error_field() {
        let resp = JsonRpcResponse::success(Some(json!(7)), json!(5));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "id": 7, "result": 5}));
    }

    #[test]
    fn error_response_omits_result_and_keeps_null_id() {
        let resp = JsonRpcResponse::error(None, PARSE_ERROR, "Parse error");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["error"]["code"], -32700);
        assert!(value.get("result").is_none());
        assert!(value["error"].get("data").is_none());
    }
}
