use serde_json::{json, Map, Value as JsonValue};

use crate::error::{Error, ErrorKind};
use crate::object::{ArgValue, ComputedObject};
use crate::types::Value;

/// Encode an expression node into the wire form shipped for remote
/// evaluation. Invocations become `{"type": "Invocation"}` objects with
/// their arguments encoded recursively, free variables become
/// `{"type": "ArgumentRef"}` references, and literal arguments pass
/// through as plain JSON.
pub fn encode(node: &ComputedObject) -> JsonValue {
    if let Some(func) = node.func() {
        let mut arguments = Map::new();
        for (name, value) in node.args() {
            arguments.insert(name.clone(), encode_arg(value));
        }
        json!({
            "type": "Invocation",
            "functionName": func.name(),
            "arguments": arguments,
        })
    } else if let Some(name) = node.var_name() {
        json!({ "type": "ArgumentRef", "value": name })
    } else {
        JsonValue::Null
    }
}

/// Compact JSON text of the wire form.
pub fn encode_to_string(node: &ComputedObject) -> Result<String, Error> {
    serde_json::to_string(&encode(node))
        .map_err(|e| Error::new(ErrorKind::Schema, format!("Failed to encode expression: {}", e)))
}

fn encode_arg(value: &ArgValue) -> JsonValue {
    match value {
        ArgValue::Literal(v) => encode_literal(v),
        ArgValue::Node(node) => encode(node),
    }
}

fn encode_literal(value: &Value) -> JsonValue {
    match value {
        // Whole numbers (epoch milliseconds and friends) stay integral on
        // the wire.
        Value::Number(n) if n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 => {
            json!(*n as i64)
        }
        Value::Number(n) => json!(n),
        Value::String(s) => json!(s),
        Value::Boolean(b) => json!(b),
        Value::Null => JsonValue::Null,
        Value::Array(items) => JsonValue::Array(items.iter().map(encode_literal).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_variable() {
        let var = ComputedObject::variable("window");
        assert_eq!(encode(&var), json!({"type": "ArgumentRef", "value": "window"}));
    }

    #[test]
    fn test_whole_numbers_encode_as_integers() {
        assert_eq!(encode_literal(&Value::Number(1498287600000.0)), json!(1498287600000i64));
        assert_eq!(encode_literal(&Value::Number(0.5)), json!(0.5));
    }
}
