//! Sample handlers served by `switchboard server`.
//!
//! - `add` (method): sum of two integers `a` and `b`
//! - `greeting/{name}` (resource): `"Hello, <name>!"`

use switchboard_core::{Args, HandlerError, HandlerRegistry, ParamSpec, RegistryError};

/// Register every sample handler. Fails on the first duplicate or
/// malformed registration.
pub fn register_all(registry: &HandlerRegistry) -> Result<(), RegistryError> {
    registry.register_method(
        "add",
        "Add two integers",
        vec![ParamSpec::integer("a"), ParamSpec::integer("b")],
        add,
    )?;
    registry.register_resource("greeting/{name}", "Greet someone by name", greeting)?;
    Ok(())
}

fn add(args: Args) -> Result<i64, HandlerError> {
    let a = args.integer("a")?;
    let b = args.integer("b")?;
    a.checked_add(b)
        .ok_or_else(|| HandlerError::new(format!("{} + {} overflows a 64-bit integer", a, b)))
}

fn greeting(args: Args) -> Result<String, HandlerError> {
    Ok(format!("Hello, {}!", args.string("name")?))
}
