//! Type coercion from untyped wire values to declared parameter kinds.
//!
//! Handlers never inspect raw JSON for their inputs. Each registration
//! declares an ordered list of [`ParamSpec`]s, and the dispatcher binds the
//! incoming payload against it: by name for method calls, by position for
//! array params and path captures. The result is an [`Args`] value whose
//! entries are guaranteed to have the declared kinds.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{CoercionError, HandlerError};

/// Primitive kind a parameter is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Integer,
    Float,
    String,
    Boolean,
    Object,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Integer => "integer",
            ParamKind::Float => "float",
            ParamKind::String => "string",
            ParamKind::Boolean => "boolean",
            ParamKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Declared name and kind of one handler parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Float)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::String)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Boolean)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Object)
    }
}

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Object(Map<String, Value>),
}

impl ArgValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ArgValue::Integer(_) => ParamKind::Integer,
            ArgValue::Float(_) => ParamKind::Float,
            ArgValue::String(_) => ParamKind::String,
            ArgValue::Boolean(_) => ParamKind::Boolean,
            ArgValue::Object(_) => ParamKind::Object,
        }
    }
}

/// Coerce one raw value into `kind`.
///
/// Numbers and numeric strings are accepted for numeric kinds. An integer
/// slot rejects any value with a non-zero fractional part rather than
/// truncating it. String, boolean and object slots only accept values that
/// already have that shape.
pub fn coerce(name: &str, raw: &Value, kind: ParamKind) -> Result<ArgValue, CoercionError> {
    let mismatch = || CoercionError::TypeMismatch {
        name: name.to_string(),
        expected: kind,
        actual: raw.clone(),
    };

    match kind {
        ParamKind::Integer => match raw {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(whole_f64_to_i64))
                .map(ArgValue::Integer)
                .ok_or_else(mismatch),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole_f64_to_i64))
                    .map(ArgValue::Integer)
                    .ok_or_else(mismatch)
            }
            _ => Err(mismatch()),
        },
        ParamKind::Float => match raw {
            Value::Number(n) => n.as_f64().map(ArgValue::Float).ok_or_else(mismatch),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(ArgValue::Float)
                .ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        ParamKind::String => match raw {
            Value::String(s) => Ok(ArgValue::String(s.clone())),
            _ => Err(mismatch()),
        },
        ParamKind::Boolean => match raw {
            Value::Bool(b) => Ok(ArgValue::Boolean(*b)),
            _ => Err(mismatch()),
        },
        ParamKind::Object => match raw {
            Value::Object(map) => Ok(ArgValue::Object(map.clone())),
            _ => Err(mismatch()),
        },
    }
}

/// `Some` only for finite values with no fractional part that fit in `i64`.
fn whole_f64_to_i64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

/// Bind a method payload to `specs`. Objects bind by name, arrays by
/// position; a missing payload binds as empty. Undeclared names are ignored.
pub fn bind_params(specs: &[ParamSpec], params: Option<&Value>) -> Result<Args, CoercionError> {
    match params {
        Some(Value::Array(items)) => bind_positional(specs, items),
        Some(Value::Object(map)) => bind_named(specs, map),
        _ => bind_named(specs, &Map::new()),
    }
}

pub fn bind_named(specs: &[ParamSpec], map: &Map<String, Value>) -> Result<Args, CoercionError> {
    let mut values = Vec::with_capacity(specs.len());
    for spec in specs {
        let raw = map
            .get(&spec.name)
            .ok_or_else(|| CoercionError::MissingParameter {
                name: spec.name.clone(),
            })?;
        values.push((spec.name.clone(), coerce(&spec.name, raw, spec.kind)?));
    }
    Ok(Args { values })
}

pub fn bind_positional(specs: &[ParamSpec], items: &[Value]) -> Result<Args, CoercionError> {
    let mut values = Vec::with_capacity(specs.len());
    for (i, spec) in specs.iter().enumerate() {
        let raw = items.get(i).ok_or_else(|| CoercionError::MissingParameter {
            name: spec.name.clone(),
        })?;
        values.push((spec.name.clone(), coerce(&spec.name, raw, spec.kind)?));
    }
    Ok(Args { values })
}

/// Bind raw path captures (always strings) to `specs` by position.
pub fn bind_captures(specs: &[ParamSpec], captures: &[String]) -> Result<Args, CoercionError> {
    let items: Vec<Value> = captures.iter().cloned().map(Value::String).collect();
    bind_positional(specs, &items)
}

/// Coerced arguments handed to a handler, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<(String, ArgValue)>,
}

impl Args {
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn at(&self, index: usize) -> Option<&ArgValue> {
        self.values.get(index).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn integer(&self, name: &str) -> Result<i64, HandlerError> {
        match self.require(name)? {
            ArgValue::Integer(i) => Ok(*i),
            other => Err(wrong_kind(name, ParamKind::Integer, other)),
        }
    }

    /// Integer arguments widen to float.
    pub fn float(&self, name: &str) -> Result<f64, HandlerError> {
        match self.require(name)? {
            ArgValue::Float(f) => Ok(*f),
            ArgValue::Integer(i) => Ok(*i as f64),
            other => Err(wrong_kind(name, ParamKind::Float, other)),
        }
    }

    pub fn string(&self, name: &str) -> Result<&str, HandlerError> {
        match self.require(name)? {
            ArgValue::String(s) => Ok(s),
            other => Err(wrong_kind(name, ParamKind::String, other)),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<bool, HandlerError> {
        match self.require(name)? {
            ArgValue::Boolean(b) => Ok(*b),
            other => Err(wrong_kind(name, ParamKind::Boolean, other)),
        }
    }

    pub fn object(&self, name: &str) -> Result<&Map<String, Value>, HandlerError> {
        match self.require(name)? {
            ArgValue::Object(map) => Ok(map),
            other => Err(wrong_kind(name, ParamKind::Object, other)),
        }
    }

    fn require(&self, name: &str) -> Result<&ArgValue, HandlerError> {
        self.get(name)
            .ok_or_else(|| HandlerError::new(format!("argument {name} was not declared")))
    }
}

fn wrong_kind(name: &str, wanted: ParamKind, got: &ArgValue) -> HandlerError {
    HandlerError::new(format!(
        "argument {name} is declared as {}, not {wanted}",
        got.kind()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_rejects_fractional_and_accepts_whole_floats() {
        let err = coerce("a", &json!(2.5), ParamKind::Integer).unwrap_err();
        assert_eq!(
            err,
            CoercionError::TypeMismatch {
                name: "a".into(),
                expected: ParamKind::Integer,
                actual: json!(2.5),
            }
        );
        assert_eq!(
            coerce("a", &json!(2.0), ParamKind::Integer).unwrap(),
            ArgValue::Integer(2)
        );
    }

    #[test]
    fn integer_accepts_numeric_strings_only() {
        assert_eq!(
            coerce("a", &json!("17"), ParamKind::Integer).unwrap(),
            ArgValue::Integer(17)
        );
        assert_eq!(
            coerce("a", &json!("4.0"), ParamKind::Integer).unwrap(),
            ArgValue::Integer(4)
        );
        assert!(coerce("a", &json!("x"), ParamKind::Integer).is_err());
        assert!(coerce("a", &json!("4.5"), ParamKind::Integer).is_err());
    }

    #[test]
    fn integer_rejects_out_of_range_floats() {
        assert!(coerce("a", &json!(1e300), ParamKind::Integer).is_err());
        assert!(coerce("a", &json!("NaN"), ParamKind::Integer).is_err());
    }

    #[test]
    fn float_accepts_integers_and_numeric_strings() {
        assert_eq!(
            coerce("f", &json!(3), ParamKind::Float).unwrap(),
            ArgValue::Float(3.0)
        );
        assert_eq!(
            coerce("f", &json!("0.25"), ParamKind::Float).unwrap(),
            ArgValue::Float(0.25)
        );
        assert!(coerce("f", &json!("inf"), ParamKind::Float).is_err());
    }

    #[test]
    fn shaped_kinds_pass_through_only_matching_values() {
        assert!(coerce("s", &json!(5), ParamKind::String).is_err());
        assert!(coerce("b", &json!("true"), ParamKind::Boolean).is_err());
        assert!(coerce("o", &json!([1]), ParamKind::Object).is_err());
        assert!(coerce("n", &json!({"k": 1}), ParamKind::Integer).is_err());
        assert_eq!(
            coerce("b", &json!(true), ParamKind::Boolean).unwrap(),
            ArgValue::Boolean(true)
        );
    }

    #[test]
    fn named_binding_requires_every_declared_param() {
        let specs = [ParamSpec::integer("a"), ParamSpec::integer("b")];
        let err = bind_params(&specs, Some(&json!({"a": 1}))).unwrap_err();
        assert_eq!(err, CoercionError::MissingParameter { name: "b".into() });

        let err = bind_params(&specs, None).unwrap_err();
        assert_eq!(err, CoercionError::MissingParameter { name: "a".into() });
    }

    #[test]
    fn named_binding_ignores_undeclared_names() {
        let specs = [ParamSpec::string("who")];
        let args = bind_params(&specs, Some(&json!({"who": "Ada", "extra": 1}))).unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args.string("who").unwrap(), "Ada");
    }

    #[test]
    fn positional_binding_follows_declaration_order() {
        let specs = [ParamSpec::integer("a"), ParamSpec::float("b")];
        let args = bind_params(&specs, Some(&json!([4, 1.5]))).unwrap();
        assert_eq!(args.integer("a").unwrap(), 4);
        assert_eq!(args.float("b").unwrap(), 1.5);
        assert_eq!(args.at(0), Some(&ArgValue::Integer(4)));
    }

    #[test]
    fn captures_bind_as_strings_then_coerce() {
        let specs = [ParamSpec::integer("id")];
        let args = bind_captures(&specs, &["42".to_string()]).unwrap();
        assert_eq!(args.integer("id").unwrap(), 42);
        assert!(bind_captures(&specs, &["abc".to_string()]).is_err());
    }

    #[test]
    fn accessor_reports_kind_confusion_as_handler_error() {
        let args = bind_params(&[ParamSpec::string("s")], Some(&json!({"s": "x"}))).unwrap();
        assert!(args.integer("s").is_err());
        assert!(args.string("missing").is_err());
    }
}
