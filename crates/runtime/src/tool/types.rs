//! Core tool types: parameter schemas and coerced argument values.

use super::ToolError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Tokens accepted as `true` when coercing a string to a boolean.
const TRUTHY: &[&str] = &["true", "yes", "1", "on"];
/// Tokens accepted as `false`.
const FALSY: &[&str] = &["false", "no", "0", "off"];

/// Semantic type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Integer,
    Float,
    String,
    Boolean,
    /// Raw JSON, passed through without coercion.
    Unstructured,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Unstructured => "unstructured",
        };
        f.write_str(s)
    }
}

impl ParamType {
    /// Coerce a raw JSON value to this type.
    ///
    /// Total per tag: returns `None` on failure and never produces a partial
    /// value. Strings coerce to integers/floats via parsing and to booleans
    /// via a fixed token set; scalars coerce to strings via display.
    pub fn coerce(self, value: &Value) -> Option<ArgValue> {
        match self {
            Self::Integer => match value {
                Value::Number(n) => n.as_i64().map(ArgValue::Int),
                Value::String(s) => s.trim().parse().ok().map(ArgValue::Int),
                _ => None,
            },
            Self::Float => match value {
                Value::Number(n) => n.as_f64().map(ArgValue::Float),
                Value::String(s) => s.trim().parse().ok().map(ArgValue::Float),
                _ => None,
            },
            Self::Boolean => match value {
                Value::Bool(b) => Some(ArgValue::Bool(*b)),
                Value::String(s) => {
                    let token = s.trim().to_ascii_lowercase();
                    if TRUTHY.contains(&token.as_str()) {
                        Some(ArgValue::Bool(true))
                    } else if FALSY.contains(&token.as_str()) {
                        Some(ArgValue::Bool(false))
                    } else {
                        None
                    }
                }
                _ => None,
            },
            Self::String => match value {
                Value::String(s) => Some(ArgValue::Str(s.clone())),
                Value::Number(n) => Some(ArgValue::Str(n.to_string())),
                Value::Bool(b) => Some(ArgValue::Str(b.to_string())),
                _ => None,
            },
            Self::Unstructured => Some(ArgValue::Json(value.clone())),
        }
    }
}

/// An argument value after coercion against the declared parameter type.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Json(Value),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

/// Coerced arguments handed to a tool handler.
///
/// Accessors return a [`ToolError`] on a missing name or type mismatch so
/// handlers can use `?` directly.
#[derive(Debug, Clone, Default)]
pub struct Args(BTreeMap<String, ArgValue>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn int(&self, name: &str) -> Result<i64, ToolError> {
        match self.get(name) {
            Some(ArgValue::Int(v)) => Ok(*v),
            Some(other) => Err(ToolError::new(format!(
                "argument '{name}' is not an integer: {other}"
            ))),
            None => Err(missing(name)),
        }
    }

    /// Float accessor; integer arguments promote losslessly.
    pub fn float(&self, name: &str) -> Result<f64, ToolError> {
        match self.get(name) {
            Some(ArgValue::Float(v)) => Ok(*v),
            Some(ArgValue::Int(v)) => Ok(*v as f64),
            Some(other) => Err(ToolError::new(format!(
                "argument '{name}' is not a float: {other}"
            ))),
            None => Err(missing(name)),
        }
    }

    pub fn str(&self, name: &str) -> Result<&str, ToolError> {
        match self.get(name) {
            Some(ArgValue::Str(v)) => Ok(v),
            Some(other) => Err(ToolError::new(format!(
                "argument '{name}' is not a string: {other}"
            ))),
            None => Err(missing(name)),
        }
    }

    pub fn bool(&self, name: &str) -> Result<bool, ToolError> {
        match self.get(name) {
            Some(ArgValue::Bool(v)) => Ok(*v),
            Some(other) => Err(ToolError::new(format!(
                "argument '{name}' is not a boolean: {other}"
            ))),
            None => Err(missing(name)),
        }
    }

    pub fn json(&self, name: &str) -> Result<&Value, ToolError> {
        match self.get(name) {
            Some(ArgValue::Json(v)) => Ok(v),
            Some(other) => Err(ToolError::new(format!(
                "argument '{name}' is not unstructured JSON: {other}"
            ))),
            None => Err(missing(name)),
        }
    }
}

fn missing(name: &str) -> ToolError {
    ToolError::new(format!("argument '{name}' not provided"))
}

/// A declared tool parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
}

/// Schema describing a tool to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique name within a [`Registry`](super::Registry).
    pub name: String,
    /// Human-readable description shown to the model.
    pub description: String,
    /// Declared parameters, in declaration order.
    pub parameters: Vec<Param>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_coercion() {
        assert_eq!(
            ParamType::Integer.coerce(&json!(42)),
            Some(ArgValue::Int(42))
        );
        assert_eq!(
            ParamType::Integer.coerce(&json!("15")),
            Some(ArgValue::Int(15))
        );
        assert_eq!(ParamType::Integer.coerce(&json!(1.5)), None);
        assert_eq!(ParamType::Integer.coerce(&json!("abc")), None);
        assert_eq!(ParamType::Integer.coerce(&json!(null)), None);
    }

    #[test]
    fn float_coercion() {
        assert_eq!(
            ParamType::Float.coerce(&json!(1.5)),
            Some(ArgValue::Float(1.5))
        );
        assert_eq!(
            ParamType::Float.coerce(&json!(3)),
            Some(ArgValue::Float(3.0))
        );
        assert_eq!(
            ParamType::Float.coerce(&json!("2.25")),
            Some(ArgValue::Float(2.25))
        );
        assert_eq!(ParamType::Float.coerce(&json!([1.0])), None);
    }

    #[test]
    fn boolean_token_set() {
        for token in ["true", "YES", "1", "On"] {
            assert_eq!(
                ParamType::Boolean.coerce(&json!(token)),
                Some(ArgValue::Bool(true)),
                "token {token}"
            );
        }
        for token in ["false", "no", "0", "OFF"] {
            assert_eq!(
                ParamType::Boolean.coerce(&json!(token)),
                Some(ArgValue::Bool(false)),
                "token {token}"
            );
        }
        assert_eq!(ParamType::Boolean.coerce(&json!("maybe")), None);
        assert_eq!(ParamType::Boolean.coerce(&json!(1)), None);
    }

    #[test]
    fn string_coercion_stringifies_scalars() {
        assert_eq!(
            ParamType::String.coerce(&json!("hi")),
            Some(ArgValue::Str("hi".into()))
        );
        assert_eq!(
            ParamType::String.coerce(&json!(7)),
            Some(ArgValue::Str("7".into()))
        );
        assert_eq!(
            ParamType::String.coerce(&json!(true)),
            Some(ArgValue::Str("true".into()))
        );
        assert_eq!(ParamType::String.coerce(&json!({"k": 1})), None);
    }

    #[test]
    fn unstructured_passes_through() {
        let value = json!({"nested": [1, 2, 3]});
        assert_eq!(
            ParamType::Unstructured.coerce(&value),
            Some(ArgValue::Json(value.clone()))
        );
    }

    #[test]
    fn args_typed_accessors() {
        let mut args = Args::new();
        args.insert("a", ArgValue::Int(2));
        args.insert("f", ArgValue::Float(0.5));
        args.insert("s", ArgValue::Str("x".into()));

        assert_eq!(args.int("a").unwrap(), 2);
        assert_eq!(args.float("a").unwrap(), 2.0);
        assert_eq!(args.float("f").unwrap(), 0.5);
        assert_eq!(args.str("s").unwrap(), "x");
        assert!(args.int("s").is_err());
        assert!(args.bool("missing").is_err());
    }
}
