//! Text-parse boundary: maps the external parser's generic tree onto the
//! value model.

use crate::error::{Error, Result};
use crate::number::Number;
use crate::value::{node, JsonArray, JsonObject, JsonValue, Node};

pub(crate) fn parse_text(input: &str) -> Result<Node> {
    let parsed: serde_json::Value =
        serde_json::from_str(input).map_err(|e| Error::Parse(e.to_string()))?;
    tree_root(parsed)
}

pub(crate) fn parse_slice(input: &[u8]) -> Result<Node> {
    let parsed: serde_json::Value =
        serde_json::from_slice(input).map_err(|e| Error::Parse(e.to_string()))?;
    tree_root(parsed)
}

fn tree_root(parsed: serde_json::Value) -> Result<Node> {
    match parsed {
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => Ok(node(convert(parsed))),
        other => Err(Error::Parse(format!(
            "the top-level value must be an array or an object, but is {}",
            kind_name(&other)
        ))),
    }
}

fn kind_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn convert(v: serde_json::Value) -> JsonValue {
    match v {
        serde_json::Value::Null => JsonValue::Null,
        serde_json::Value::Bool(b) => JsonValue::Boolean(b),
        serde_json::Value::Number(n) => JsonValue::Number(convert_number(&n)),
        serde_json::Value::String(s) => JsonValue::String(s),
        serde_json::Value::Array(items) => {
            let mut arr = JsonArray::new();
            for item in items {
                arr.push(Some(node(convert(item))));
            }
            JsonValue::Array(arr)
        }
        serde_json::Value::Object(map) => {
            let mut obj = JsonObject::new();
            for (key, value) in map {
                obj.set(key, node(convert(value)));
            }
            JsonValue::Object(obj)
        }
    }
}

fn convert_number(n: &serde_json::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::from_i64(i)
    } else if let Some(u) = n.as_u64() {
        Number::from_u64(u)
    } else {
        Number::from_f64(n.as_f64().unwrap_or(0.0))
    }
}
