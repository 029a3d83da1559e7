use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coarse classification of a document value.
///
/// Used to report which kind of value an operation could not handle, and to
/// rank values of different kinds when the store orders documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// JSON null
    Null,
    /// JSON boolean
    Bool,
    /// Integer number
    Int,
    /// Floating-point number
    Float,
    /// String
    String,
    /// List of values
    Array,
    /// Nested map
    Object,
}

impl ValueKind {
    /// Classify a serde_json `Value`.
    pub fn of_value(v: &Value) -> ValueKind {
        match v {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    ValueKind::Int
                } else {
                    ValueKind::Float
                }
            }
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Position of the kind in the store's cross-type ordering.
    /// Integers and floats share a rank so they compare numerically.
    pub fn rank(&self) -> u8 {
        match self {
            ValueKind::Null => 0,
            ValueKind::Bool => 1,
            ValueKind::Int | ValueKind::Float => 2,
            ValueKind::String => 3,
            ValueKind::Array => 4,
            ValueKind::Object => 5,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "map",
        };
        f.write_str(name)
    }
}
