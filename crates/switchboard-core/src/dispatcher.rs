//! Transport-agnostic dispatcher.
//!
//! `Dispatcher` resolves decoded requests against a [`HandlerRegistry`],
//! binds parameters, invokes the handler and builds the response. It is
//! free of any HTTP or framework dependency so it can be driven from an
//! axum handler, a CLI command or a test alike.
//!
//! # Usage
//!
//! ```ignore
//! let dispatcher = Dispatcher::new(Arc::new(registry));
//!
//! // From raw bytes (None for notifications):
//! let response_bytes = dispatcher.handle_bytes(body);
//!
//! // From a resource path:
//! let value = dispatcher.handle_resource("/greeting/Ada")?;
//! ```

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;

use crate::coerce::{self, Args};
use crate::error::{HandlerError, ResourceError};
use crate::registry::{HandlerFn, HandlerRegistry};
use crate::rpc::codec;
use crate::rpc::error::{ParamErrorPolicy, RpcError};
use crate::rpc::types::{JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};

#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    policy: ParamErrorPolicy,
}

impl Dispatcher {
    /// Create a dispatcher over `registry` using the conflated param-error
    /// policy.
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self {
            registry,
            policy: ParamErrorPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ParamErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn policy(&self) -> ParamErrorPolicy {
        self.policy
    }

    /// Handle raw request bytes and return the encoded response, or `None`
    /// when the request was a notification.
    pub fn handle_bytes(&self, raw: &[u8]) -> Option<Vec<u8>> {
        match codec::decode(raw) {
            Ok(request) => self.handle(request).map(|resp| codec::encode(&resp)),
            Err(err) => Some(codec::encode(&err.into_error_response())),
        }
    }

    /// Handle a pre-parsed `serde_json::Value`. Useful for transports that
    /// already do their own parsing.
    pub fn handle_value(&self, value: Value) -> Option<Value> {
        let response = match codec::decode_value(value) {
            Ok(request) => self.handle(request)?,
            Err(err) => err.into_error_response(),
        };
        Some(serde_json::to_value(response).unwrap_or_default())
    }

    /// Dispatch a decoded request. Returns `None` for notifications, whose
    /// failures are logged instead of answered.
    pub fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.jsonrpc.as_deref() != Some(JSONRPC_VERSION) {
            let err = RpcError::InvalidRequest(match &request.jsonrpc {
                Some(tag) => format!("unsupported jsonrpc version {tag:?}, expected \"2.0\""),
                None => "missing jsonrpc version tag".into(),
            });
            return Some(err.to_response(request.id));
        }

        let outcome = self.call(&request);

        let Some(id) = request.id else {
            if let Err(err) = outcome {
                tracing::warn!(
                    method = %request.method,
                    code = err.code(),
                    "Notification failed: {}",
                    err
                );
            }
            return None;
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(Some(id), result),
            Err(err) => {
                tracing::debug!(method = %request.method, code = err.code(), "Call failed: {}", err);
                err.to_response(Some(id))
            }
        })
    }

    fn call(&self, request: &JsonRpcRequest) -> Result<Value, RpcError> {
        let entry = self
            .registry
            .lookup_method(&request.method)
            .ok_or_else(|| RpcError::MethodNotFound(request.method.clone()))?;

        let args = coerce::bind_params(&entry.params, request.params.as_ref())
            .map_err(|e| RpcError::InvalidParams(e, self.policy))?;

        tracing::debug!(method = %entry.name, "Dispatching method");
        Ok(invoke(&entry.handler, args, &entry.name)?)
    }

    /// Resolve a resource path, bind its captures and invoke the handler.
    /// The caller wraps the value as `{"result": value}`.
    pub fn handle_resource(&self, path: &str) -> Result<Value, ResourceError> {
        let (entry, captures) = self
            .registry
            .lookup_resource(path)
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))?;

        let args = coerce::bind_captures(&entry.params, &captures)?;

        tracing::debug!(template = %entry.pattern.template(), path, "Dispatching resource");
        Ok(invoke(&entry.handler, args, entry.pattern.template())?)
    }
}

/// Run a handler, turning a panic into a handler failure so the serving
/// process survives it.
fn invoke(handler: &HandlerFn, args: Args, key: &str) -> Result<Value, HandlerError> {
    match panic::catch_unwind(AssertUnwindSafe(|| handler(args))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let detail = panic_message(payload.as_ref());
            tracing::error!(handler = key, "Handler panicked: {}", detail);
            Err(HandlerError::new(format!("handler panicked: {}", detail)))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
