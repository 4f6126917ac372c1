//! Wire codec: raw bytes in, envelopes out, and back.
//!
//! Decoding happens in two steps so that syntactically broken input
//! (`-32700`) is told apart from well-formed JSON that is not a request
//! object (`-32600`). In the latter case the `id` is salvaged when possible
//! so the error response can still echo it.

use serde_json::Value;

use super::error::RpcError;
use super::types::{JsonRpcRequest, JsonRpcResponse};

/// Why a payload could not be turned into a [`JsonRpcRequest`].
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Invalid Request: {reason}")]
    InvalidRequest {
        /// The `id` field, if the payload was an object carrying one.
        id: Option<Value>,
        reason: String,
    },
}

impl DecodeError {
    /// The request id to echo, when one could be read.
    pub fn id(&self) -> Option<Value> {
        match self {
            DecodeError::InvalidRequest { id, .. } => id.clone(),
            DecodeError::Parse(_) => None,
        }
    }

    /// The error response for a payload that never became a valid request.
    /// Such payloads are always answered, even without an id.
    pub fn into_error_response(self) -> JsonRpcResponse {
        let id = self.id();
        RpcError::from(self).to_response(id)
    }
}

/// Decode a request envelope from raw bytes.
pub fn decode(raw: &[u8]) -> Result<JsonRpcRequest, DecodeError> {
    let value: Value = serde_json::from_slice(raw).map_err(DecodeError::Parse)?;
    decode_value(value)
}

/// Decode a request envelope from an already-parsed JSON value.
pub fn decode_value(value: Value) -> Result<JsonRpcRequest, DecodeError> {
    let Value::Object(ref object) = value else {
        return Err(DecodeError::InvalidRequest {
            id: None,
            reason: "request must be a JSON object".into(),
        });
    };
    let id = object.get("id").cloned();

    match object.get("params") {
        None | Some(Value::Null) | Some(Value::Object(_)) | Some(Value::Array(_)) => {}
        Some(_) => {
            return Err(DecodeError::InvalidRequest {
                id,
                reason: "params must be an object or an array".into(),
            })
        }
    }

    serde_json::from_value(value).map_err(|e| DecodeError::InvalidRequest {
        id,
        reason: e.to_string(),
    })
}

/// Encode a response envelope. Serializing a `JsonRpcResponse` cannot fail:
/// every field is a string, a number or a `serde_json::Value`.
pub fn encode(response: &JsonRpcResponse) -> Vec<u8> {
    serde_json::to_vec(response).unwrap_or_else(|e| {
        tracing::error!("Failed to serialize response: {}", e);
        br#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Failed to serialize response"}}"#.to_vec()
    })
}

/// Decode a response envelope (used by clients and round-trip checks).
pub fn decode_response(raw: &[u8]) -> Result<JsonRpcResponse, serde_json::Error> {
    serde_json::from_slice(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::types::JSONRPC_VERSION;
    use serde_json::json;

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = decode(br#"{"jsonrpc": "2.0", "method": "add""#).unwrap_err();
        assert!(matches!(err, DecodeError::Parse(_)));
    }

    #[test]
    fn non_object_is_an_invalid_request() {
        let err = decode(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidRequest { id: None, .. }));
    }

    #[test]
    fn missing_method_keeps_the_id() {
        let err = decode(br#"{"jsonrpc": "2.0", "id": "abc"}"#).unwrap_err();
        match err {
            DecodeError::InvalidRequest { id, .. } => assert_eq!(id, Some(json!("abc"))),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn scalar_params_are_rejected() {
        let err = decode(br#"{"jsonrpc": "2.0", "id": 1, "method": "add", "params": 3}"#)
            .unwrap_err();
        assert!(matches!(err, DecodeError::InvalidRequest { .. }));
    }

    #[test]
    fn missing_version_still_decodes() {
        let req = decode(br#"{"id": 1, "method": "add"}"#).unwrap();
        assert_eq!(req.jsonrpc, None);
        assert_eq!(req.method, "add");
    }

    #[test]
    fn decodes_canonical_request() {
        let req = decode(br#"{"jsonrpc":"2.0","id":4,"method":"add","params":{"a":2,"b":3}}"#)
            .unwrap();
        assert_eq!(req.jsonrpc.as_deref(), Some(JSONRPC_VERSION));
        assert_eq!(req.id, Some(json!(4)));
        assert_eq!(req.params, Some(json!({"a": 2, "b": 3})));
    }

    #[test]
    fn success_response_survives_encode_then_decode() {
        let raw = br#"{"result":{"sum":5,"tags":["a",null]},"id":"req-1","jsonrpc":"2.0"}"#;
        let decoded = decode_response(raw).unwrap();
        let reencoded: Value = serde_json::from_slice(&encode(&decoded)).unwrap();
        let original: Value = serde_json::from_slice(raw).unwrap();
        assert_eq!(reencoded, original);
    }

    #[test]
    fn null_result_is_not_dropped() {
        let raw = br#"{"jsonrpc":"2.0","id":1,"result":null}"#;
        let decoded = decode_response(raw).unwrap();
        assert_eq!(decoded.result, Some(Value::Null));
        let reencoded: Value = serde_json::from_slice(&encode(&decoded)).unwrap();
        assert_eq!(reencoded, json!({"jsonrpc": "2.0", "id": 1, "result": null}));
    }
}
