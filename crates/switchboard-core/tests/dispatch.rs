//! End-to-end dispatch through the public API: registration, raw bytes in,
//! raw bytes out.

use std::sync::Arc;

use serde_json::{json, Value};
use switchboard_core::{
    Args, Dispatcher, HandlerError, HandlerRegistry, ParamSpec, RegistryError,
};

fn build() -> Dispatcher {
    let registry = HandlerRegistry::new();
    registry
        .register_method(
            "add",
            "Add two integers",
            vec![ParamSpec::integer("a"), ParamSpec::integer("b")],
            |args: Args| Ok(args.integer("a")? + args.integer("b")?),
        )
        .unwrap();
    registry
        .register_method(
            "describe",
            "Echo a structured payload",
            vec![
                ParamSpec::string("label"),
                ParamSpec::boolean("loud"),
                ParamSpec::float("weight"),
                ParamSpec::object("meta"),
            ],
            |args: Args| {
                let label = args.string("label")?;
                let label = if args.boolean("loud")? {
                    label.to_uppercase()
                } else {
                    label.to_string()
                };
                Ok(json!({
                    "label": label,
                    "weight": args.float("weight")?,
                    "keys": args.object("meta")?.keys().cloned().collect::<Vec<_>>(),
                }))
            },
        )
        .unwrap();
    registry
        .register_resource("greeting/{name}", "Greet someone", |args: Args| {
            Ok(format!("Hello, {}!", args.string("name")?))
        })
        .unwrap();
    Dispatcher::new(Arc::new(registry))
}

fn roundtrip(dispatcher: &Dispatcher, body: &str) -> Value {
    let out = dispatcher
        .handle_bytes(body.as_bytes())
        .expect("expected a response");
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn result_is_returned_unmodified_with_echoed_id() {
    let d = build();
    let resp = roundtrip(
        &d,
        r#"{"jsonrpc":"2.0","id":"abc-1","method":"describe","params":{"label":"box","loud":true,"weight":2,"meta":{"k":1}}}"#,
    );
    assert_eq!(resp["id"], "abc-1");
    assert_eq!(
        resp["result"],
        json!({"label": "BOX", "weight": 2.0, "keys": ["k"]})
    );
}

#[test]
fn unregistered_methods_are_exactly_method_not_found() {
    let d = build();
    for (id, method) in [(json!(1), "subtract"), (json!("x"), ""), (json!(null), "Add")] {
        let body = json!({"jsonrpc": "2.0", "id": id, "method": method}).to_string();
        let resp = roundtrip(&d, &body);
        assert_eq!(resp["jsonrpc"], "2.0");
        assert_eq!(resp["id"], id);
        assert_eq!(resp["error"]["code"], -32601);
        assert!(resp.get("result").is_none());
    }
}

#[test]
fn malformed_payloads_are_parse_errors() {
    let d = build();
    for body in ["", "{", "nul", r#"{"jsonrpc":"2.0",}"#, "\u{0}"] {
        let resp = roundtrip(&d, body);
        assert_eq!(resp["error"]["code"], -32700, "{body:?}");
        assert!(resp.get("result").is_none());
    }
}

#[test]
fn shape_mismatches_never_reach_the_handler() {
    let d = build();
    let resp = roundtrip(
        &d,
        r#"{"jsonrpc":"2.0","id":1,"method":"describe","params":{"label":1,"loud":true,"weight":2,"meta":{}}}"#,
    );
    assert_eq!(resp["error"]["code"], -32603);
    assert_eq!(resp["error"]["data"]["expected"], "string");
}

#[test]
fn resource_and_method_share_one_registry() {
    let d = build();
    assert_eq!(d.handle_resource("greeting/Ada").unwrap(), "Hello, Ada!");
    assert_eq!(d.registry().methods().len(), 2);
    assert_eq!(d.registry().resources().len(), 1);
}

#[test]
fn registration_errors_surface_to_the_caller() {
    let d = build();
    let err = d
        .registry()
        .register_method("add", "again", vec![], |_: Args| Ok::<_, HandlerError>(0))
        .unwrap_err();
    assert_eq!(err, RegistryError::DuplicateKey("add".into()));
}

#[test]
fn concurrent_requests_complete_independently() {
    let d = build();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8i64)
            .map(|i| {
                let d = &d;
                s.spawn(move || {
                    let body = json!({
                        "jsonrpc": "2.0",
                        "id": i,
                        "method": "add",
                        "params": {"a": i, "b": i}
                    })
                    .to_string();
                    roundtrip(d, &body)
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let resp = handle.join().unwrap();
            assert_eq!(resp["id"], i as i64);
            assert_eq!(resp["result"], 2 * i as i64);
        }
    });
}
