//! CLI command implementations.
//!
//! Each submodule corresponds to a top-level CLI command. Local commands
//! run against a registry populated with the sample handlers.

pub mod call;
pub mod methods;
pub mod rpc;
pub mod server;

use std::sync::Arc;

use switchboard_core::HandlerRegistry;

use crate::handlers;

/// Build the registry the server and local commands dispatch against.
/// A registration failure is a wiring bug and aborts startup.
pub fn init_registry() -> Result<Arc<HandlerRegistry>, String> {
    let registry = HandlerRegistry::new();
    handlers::register_all(&registry).map_err(|e| format!("Failed to register handlers: {}", e))?;
    Ok(Arc::new(registry))
}

/// Parse a `--params` argument. An empty string means no params.
pub fn parse_params(raw: &str) -> Result<Option<serde_json::Value>, String> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(raw)
        .map(Some)
        .map_err(|e| format!("Invalid JSON params: {}", e))
}

/// Pretty-print a JSON value to stdout.
pub fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    );
}
