//! Switchboard Core: transport-agnostic RPC and resource dispatch.
//!
//! Handlers are registered at startup under a method name or a path
//! template, each with an explicit list of typed parameter descriptors.
//! Incoming requests are decoded, resolved against the registry, bound to
//! those descriptors, invoked, and answered with a JSON-RPC 2.0 envelope
//! (methods) or a bare `{"result": ...}` value (resources).
//!
//! The crate has **no HTTP framework dependency** by default, making it
//! suitable for use in:
//!
//! - HTTP servers (via `switchboard-server`)
//! - CLI tools (in-process calls)
//! - Tests
//!
//! # Feature Flags
//!
//! - `axum`: Enables `IntoResponse` impl on `ResourceError` for use in axum handlers.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use switchboard_core::{Args, Dispatcher, HandlerRegistry, ParamSpec};
//!
//! let registry = HandlerRegistry::new();
//! registry.register_method(
//!     "add",
//!     "Add two integers",
//!     vec![ParamSpec::integer("a"), ParamSpec::integer("b")],
//!     |args: Args| Ok(args.integer("a")? + args.integer("b")?),
//! )?;
//!
//! let dispatcher = Dispatcher::new(Arc::new(registry));
//! let response = dispatcher.handle_bytes(br#"{"jsonrpc":"2.0","id":1,"method":"add","params":{"a":2,"b":3}}"#);
//! ```

pub mod coerce;
pub mod dispatcher;
pub mod error;
pub mod pattern;
pub mod registry;
pub mod rpc;

// Convenience re-exports
pub use coerce::{ArgValue, Args, ParamKind, ParamSpec};
pub use dispatcher::Dispatcher;
pub use error::{CoercionError, HandlerError, RegistryError, ResourceError};
pub use pattern::PathPattern;
pub use registry::{HandlerRegistry, MethodInfo, ResourceInfo};
pub use rpc::{JsonRpcRequest, JsonRpcResponse, ParamErrorPolicy, RpcError};
