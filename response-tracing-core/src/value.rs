pub type Value = serde_json::Value;

/// Wraps non-object values as `{"value": ...}` so run inputs are always maps.
pub fn ensure_object(value: Value) -> Value {
    match value {
        Value::Object(_) => value,
        other => Value::Object(serde_json::Map::from_iter([("value".to_string(), other)])),
    }
}
