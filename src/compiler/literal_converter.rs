use serde_json::{Number, Value};
use sqlparser::ast::{Expr, UnaryOperator, Value as SqlValue};

use crate::error::{FireqlError, FireqlResult};

/// Converts SQL literals on the right side of a comparison into store values.
pub struct LiteralConverter;

impl LiteralConverter {
    pub fn convert(expr: &Expr) -> FireqlResult<Value> {
        match expr {
            Expr::Value(v) => Self::scalar(&v.value),
            Expr::Nested(inner) => Self::convert(inner),
            Expr::Tuple(items) => items.iter().map(Self::convert).collect::<FireqlResult<Vec<_>>>().map(Value::Array),
            Expr::UnaryOp { op: UnaryOperator::Minus, expr: inner } => match Self::convert(inner)? {
                Value::Number(n) => Self::negate(&n).ok_or_else(|| FireqlError::ValueConversion(expr.to_string())),
                _ => FireqlError::ValueConversion(expr.to_string()).err(),
            },
            Expr::UnaryOp { op: UnaryOperator::Plus, expr: inner } => match Self::convert(inner)? {
                number @ Value::Number(_) => Ok(number),
                _ => FireqlError::ValueConversion(expr.to_string()).err(),
            },
            other => FireqlError::ValueConversion(other.to_string()).err(),
        }
    }

    /// Integers stay integers, anything with a fraction or exponent is a float.
    pub fn scalar(value: &SqlValue) -> FireqlResult<Value> {
        match value {
            SqlValue::Number(n, _) => {
                if let Ok(i) = n.parse::<i64>() {
                    return Ok(Value::from(i));
                }
                n.parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| FireqlError::ValueConversion(n.clone()))
            }
            SqlValue::SingleQuotedString(s) | SqlValue::DoubleQuotedString(s) => Ok(Value::String(s.clone())),
            SqlValue::Boolean(b) => Ok(Value::Bool(*b)),
            SqlValue::Null => Ok(Value::Null),
            other => FireqlError::ValueConversion(other.to_string()).err(),
        }
    }

    fn negate(n: &Number) -> Option<Value> {
        if let Some(i) = n.as_i64() {
            return i.checked_neg().map(Value::from);
        }
        n.as_f64().and_then(|f| Number::from_f64(-f)).map(Value::Number)
    }
}
