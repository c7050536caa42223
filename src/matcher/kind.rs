use std::fmt;
use serde_json::Value;

use crate::model::PrimitiveKind;

/// Runtime kind of a parsed JSON value.
///
/// Numbers split on representation: anything serde_json holds as `i64`/`u64`
/// is an integer, anything held as `f64` is a float, even `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    List,
    Mapping,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(n) if n.is_f64() => ValueKind::Float,
            Value::Number(_) => ValueKind::Integer,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::List,
            Value::Object(_) => ValueKind::Mapping,
        }
    }

    pub fn as_primitive(self) -> Option<PrimitiveKind> {
        match self {
            ValueKind::Null => Some(PrimitiveKind::Null),
            ValueKind::Boolean => Some(PrimitiveKind::Boolean),
            ValueKind::Integer => Some(PrimitiveKind::Integer),
            ValueKind::Float => Some(PrimitiveKind::Float),
            ValueKind::String => Some(PrimitiveKind::String),
            ValueKind::List | ValueKind::Mapping => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Mapping => "mapping",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
