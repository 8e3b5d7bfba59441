use rusqlite::types::Value;
use serde_json::Value as JsonValue;

/// JSON truthiness: `null`, `false`, `0`, `NaN` and `""` are false,
/// everything else (including empty arrays and objects) is true.
pub fn is_truthy(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => false,
        Some(JsonValue::Bool(b)) => *b,
        Some(JsonValue::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(JsonValue::String(s)) => !s.is_empty(),
        Some(JsonValue::Array(_) | JsonValue::Object(_)) => true,
    }
}

/// Map a JSON value onto the closest SQLite storage class.
pub fn to_sql(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Integer(i64::from(*b)),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map_or(Value::Null, Value::Real),
        },
        JsonValue::String(s) => Value::Text(s.clone()),
        // Nested values are stored as their JSON text
        other => Value::Text(other.to_string()),
    }
}
