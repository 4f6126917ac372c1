//! JSON-RPC 2.0 protocol layer: envelope types, wire codec and the error
//! mapping onto the reserved code taxonomy.
//!
//! # Example
//!
//! ```ignore
//! use switchboard_core::rpc::codec;
//!
//! let request = codec::decode(br#"{
//!     "jsonrpc": "2.0",
//!     "id": 1,
//!     "method": "add",
//!     "params": { "a": 2, "b": 3 }
//! }"#)?;
//! ```

pub mod codec;
pub mod error;
pub mod types;

pub use codec::DecodeError;
pub use error::{ParamErrorPolicy, RpcError};
pub use types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
