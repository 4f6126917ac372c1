//! `switchboard methods`: List the handlers the server would expose.

use super::{init_registry, print_json};

pub fn list() -> Result<(), String> {
    let registry = init_registry()?;
    print_json(&serde_json::json!({
        "methods": registry.methods(),
        "resources": registry.resources(),
    }));
    Ok(())
}
