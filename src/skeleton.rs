use serde_json::{Map, Value};

use crate::matcher::ValueKind;

/// Compact picture of a value's shape.
///
/// Scalars become their kind name, arrays keep only their first element,
/// objects keep their keys. Meant for printing next to a failing report.
pub fn simplify(value: &Value) -> Value {
    match value {
        Value::Array(items) => match items.first() {
            Some(first) => Value::Array(vec![simplify(first)]),
            None => Value::Array(Vec::new()),
        },
        Value::Object(map) => {
            let out: Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), simplify(v)))
                .collect();
            Value::Object(out)
        }
        scalar => Value::from(ValueKind::of(scalar).as_str()),
    }
}
