//! Minimal HTTP client for a running Switchboard server.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use switchboard_core::rpc::{JsonRpcRequest, JsonRpcResponse};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    #[error("Response carried neither result nor error")]
    EmptyResponse,
}

/// JSON-RPC client that posts to `<base_url>/api/rpc`.
pub struct RpcClient {
    endpoint: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            endpoint: format!("{}/api/rpc", base_url.trim_end_matches('/')),
            http: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Call `method` and return its result.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(Value::from(id), method, params);

        let body = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .bytes()
            .await?;

        let response: JsonRpcResponse = serde_json::from_slice(&body)
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        match (response.result, response.error) {
            (_, Some(error)) => Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(ClientError::EmptyResponse),
        }
    }

    /// Send a notification. The server answers with no body.
    pub async fn notify(&self, method: &str, params: Option<Value>) -> Result<(), ClientError> {
        let request = JsonRpcRequest::notification(method, params);
        self.http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
