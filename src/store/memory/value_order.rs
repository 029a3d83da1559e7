use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::store::{FilterOp, ValueKind};

/// Value comparison rules of the memory store.
///
/// Values of different kinds order by kind rank
/// (null < bool < number < string < array < map). Integers and floats compare
/// numerically.
pub struct ValueOrder;

impl ValueOrder {
    pub fn compare(a: &Value, b: &Value) -> Ordering {
        let (ka, kb) = (ValueKind::of_value(a), ValueKind::of_value(b));
        if ka.rank() != kb.rank() {
            return ka.rank().cmp(&kb.rank());
        }
        match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Number(x), Value::Number(y)) => Self::compare_numbers(x, y),
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::Array(x), Value::Array(y)) => {
                for (l, r) in x.iter().zip(y.iter()) {
                    let ord = Self::compare(l, r);
                    if !ord.is_eq() {
                        return ord;
                    }
                }
                x.len().cmp(&y.len())
            }
            (Value::Object(_), Value::Object(_)) => a.to_string().cmp(&b.to_string()),
            _ => Ordering::Equal,
        }
    }

    /// Two integers compare exactly; a float on either side compares as `f64`.
    pub fn compare_numbers(x: &Number, y: &Number) -> Ordering {
        if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
            return a.cmp(&b);
        }
        if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
            return a.cmp(&b);
        }
        let (a, b) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    }

    pub fn equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => Self::compare_numbers(x, y).is_eq(),
            _ => a == b,
        }
    }

    /// Whether a document value satisfies `value op operand`.
    pub fn matches(value: &Value, op: FilterOp, operand: &Value) -> bool {
        let same_rank = || ValueKind::of_value(value).rank() == ValueKind::of_value(operand).rank();
        match op {
            FilterOp::Equal => Self::equal(value, operand),
            FilterOp::NotEqual => !value.is_null() && !Self::equal(value, operand),
            FilterOp::LessThan => same_rank() && Self::compare(value, operand).is_lt(),
            FilterOp::LessThanOrEqual => same_rank() && Self::compare(value, operand).is_le(),
            FilterOp::GreaterThan => same_rank() && Self::compare(value, operand).is_gt(),
            FilterOp::GreaterThanOrEqual => same_rank() && Self::compare(value, operand).is_ge(),
            FilterOp::In => match operand {
                Value::Array(list) => list.iter().any(|item| Self::equal(value, item)),
                _ => false,
            },
            FilterOp::NotIn => match operand {
                Value::Array(list) => !value.is_null() && !list.iter().any(|item| Self::equal(value, item)),
                _ => false,
            },
        }
    }
}
