//! Tree ⇄ JSON conversion.
//!
//! A node is a JSON object: its type under `$type` (left out for anonymous nodes), its name
//! under `$name`, and one key per field. Field kinds are inferred from JSON value types when
//! parsing. `none` nodes and empty arrays are never written.

use serde_json::{Map, Number, Value};
use tracing::instrument;

use crate::domain::{Field, FieldValue, Node, NodeBuilder, NodeRef, ANONYMOUS_NODE_TYPE};
use crate::infrastructure::error::{InfraError, InfraResult};

pub const TYPE_KEY: &str = "$type";
pub const NAME_KEY: &str = "$name";

/// Largest integer an `f64` holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Compose a node (and its subtree) into a JSON value. Composing a `none` node fails.
#[instrument(level = "trace", skip_all, fields(node_type = node.node_type()))]
pub fn compose_json(node: &Node) -> InfraResult<Value> {
    if node.is_none() {
        return Err(InfraError::NoneNode);
    }

    let mut object = Map::new();
    if !node.is_anonymous() {
        object.insert(TYPE_KEY.to_string(), Value::String(node.node_type().to_string()));
    }
    if let Some(name) = node.name() {
        object.insert(NAME_KEY.to_string(), Value::String(name.to_string()));
    }

    for field in node.fields() {
        let key = field.name();
        if key == TYPE_KEY || key == NAME_KEY {
            return Err(InfraError::ReservedKey(key.to_string()));
        }
        if let Some(value) = compose_field(field)? {
            object.insert(key.to_string(), value);
        }
    }
    Ok(Value::Object(object))
}

/// `None` when the field is left out of the output.
fn compose_field(field: &Field) -> InfraResult<Option<Value>> {
    let key = field.name();
    let value = match field.value() {
        FieldValue::String(v) => Value::String(v.clone()),
        FieldValue::Number(v) => compose_number(key, *v)?,
        FieldValue::Boolean(v) => Value::Bool(*v),
        FieldValue::Node(child) => {
            if child.is_none() {
                return Ok(None);
            }
            compose_json(child)?
        }
        FieldValue::StringArray(values) => {
            if values.is_empty() {
                return Ok(None);
            }
            Value::Array(values.iter().cloned().map(Value::String).collect())
        }
        FieldValue::NumberArray(values) => {
            if values.is_empty() {
                return Ok(None);
            }
            Value::Array(
                values
                    .iter()
                    .map(|v| compose_number(key, *v))
                    .collect::<InfraResult<_>>()?,
            )
        }
        FieldValue::BooleanArray(values) => {
            if values.is_empty() {
                return Ok(None);
            }
            Value::Array(values.iter().copied().map(Value::Bool).collect())
        }
        FieldValue::NodeArray(children) => {
            let composed = children
                .iter()
                .filter(|c| !c.is_none())
                .map(|c| compose_json(c))
                .collect::<InfraResult<Vec<_>>>()?;
            if composed.is_empty() {
                return Ok(None);
            }
            Value::Array(composed)
        }
    };
    Ok(Some(value))
}

/// Whole numbers are written as JSON integers.
fn compose_number(key: &str, value: f64) -> InfraResult<Value> {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        return Ok(Value::from(value as i64));
    }
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| InfraError::NonFiniteNumber {
            key: key.to_string(),
            value,
        })
}

pub fn compose_json_text(node: &Node, pretty: bool) -> InfraResult<String> {
    let value = compose_json(node)?;
    let text = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    text.map_err(|e| InfraError::json("compose tree", e))
}

/// Parse a tree from JSON text.
#[instrument(level = "debug", skip_all, fields(len = text.len()))]
pub fn parse_json(text: &str) -> InfraResult<NodeRef> {
    let value: Value = serde_json::from_str(text).map_err(|e| InfraError::json("parse tree", e))?;
    parse_json_value(&value)
}

/// Parse a tree from an already decoded JSON value.
pub fn parse_json_value(value: &Value) -> InfraResult<NodeRef> {
    let object = value.as_object().ok_or_else(|| InfraError::NotAnObject {
        what: "node".to_string(),
        actual: json_kind(value).to_string(),
    })?;

    let node_type = match object.get(TYPE_KEY) {
        None => ANONYMOUS_NODE_TYPE,
        Some(Value::String(node_type)) => node_type.as_str(),
        Some(other) => {
            return Err(InfraError::UnsupportedValue {
                key: TYPE_KEY.to_string(),
                expected: "string".to_string(),
                actual: json_kind(other).to_string(),
            })
        }
    };

    let mut builder = NodeBuilder::new(node_type);
    match object.get(NAME_KEY) {
        None => {}
        Some(Value::String(name)) => {
            builder.name(name.as_str());
        }
        Some(other) => {
            return Err(InfraError::UnsupportedValue {
                key: NAME_KEY.to_string(),
                expected: "string".to_string(),
                actual: json_kind(other).to_string(),
            })
        }
    }

    for (key, value) in object {
        if key == TYPE_KEY || key == NAME_KEY {
            continue;
        }
        if let Some(field) = parse_field(key, value)? {
            builder.push_field(field)?;
        }
    }
    Ok(builder.build()?)
}

/// `None` for empty arrays, whose element kind cannot be inferred.
fn parse_field(key: &str, value: &Value) -> InfraResult<Option<Field>> {
    let field = match value {
        Value::String(v) => Field::string(key, v.as_str()),
        Value::Number(v) => Field::number(key, parse_number(key, v)?),
        Value::Bool(v) => Field::boolean(key, *v),
        Value::Object(_) => Field::node(key, parse_json_value(value)?),
        Value::Array(items) => return parse_array(key, items),
        Value::Null => {
            return Err(InfraError::UnsupportedValue {
                key: key.to_string(),
                expected: "string, number, boolean, object or array".to_string(),
                actual: "null".to_string(),
            })
        }
    };
    Ok(Some(field))
}

fn parse_number(key: &str, number: &Number) -> InfraResult<f64> {
    number.as_f64().ok_or_else(|| InfraError::UnsupportedValue {
        key: key.to_string(),
        expected: "number representable as f64".to_string(),
        actual: number.to_string(),
    })
}

fn parse_array(key: &str, items: &[Value]) -> InfraResult<Option<Field>> {
    let Some(first) = items.first() else {
        return Ok(None);
    };

    let mixed = |item: &Value| InfraError::MixedArray {
        key: key.to_string(),
        expected: json_kind(first).to_string(),
        actual: json_kind(item).to_string(),
    };

    let field = match first {
        Value::String(_) => Field::string_array(
            key,
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or_else(|| mixed(item)))
                .collect::<InfraResult<_>>()?,
        ),
        Value::Number(_) => Field::number_array(
            key,
            items
                .iter()
                .map(|item| match item {
                    Value::Number(n) => parse_number(key, n),
                    _ => Err(mixed(item)),
                })
                .collect::<InfraResult<_>>()?,
        ),
        Value::Bool(_) => Field::boolean_array(
            key,
            items
                .iter()
                .map(|item| item.as_bool().ok_or_else(|| mixed(item)))
                .collect::<InfraResult<_>>()?,
        ),
        Value::Object(_) => Field::node_array(
            key,
            items
                .iter()
                .map(|item| match item {
                    Value::Object(_) => parse_json_value(item),
                    _ => Err(mixed(item)),
                })
                .collect::<InfraResult<_>>()?,
        ),
        Value::Array(_) | Value::Null => {
            return Err(InfraError::UnsupportedValue {
                key: key.to_string(),
                expected: "array of strings, numbers, booleans or objects".to_string(),
                actual: format!("array of {}", json_kind(first)),
            })
        }
    };
    Ok(Some(field))
}
