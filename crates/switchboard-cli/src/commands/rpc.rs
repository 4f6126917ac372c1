//! `switchboard rpc`: In-process JSON-RPC invocation, no server needed.

use switchboard_core::{Dispatcher, ParamErrorPolicy};

use super::{init_registry, parse_params, print_json};

pub fn call(method: &str, params_str: &str, policy: ParamErrorPolicy) -> Result<(), String> {
    let mut request = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
    });
    if let Some(params) = parse_params(params_str)? {
        request["params"] = params;
    }

    tracing::debug!(method, "Dispatching in-process");
    let dispatcher = Dispatcher::new(init_registry()?).with_policy(policy);
    match dispatcher.handle_value(request) {
        Some(response) => print_json(&response),
        None => println!("(no response)"),
    }
    Ok(())
}
