use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};
use serde_json::{Number, Value};
use sqlparser::ast::BinaryOperator;

use crate::store::{memory::ValueOrder, ValueKind};

/// Numbers inside expressions are plain floats.
pub fn as_number(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// A computed number. NaN and infinities are errors, never `null`.
pub fn number_value(n: f64) -> Result<Value, String> {
    Number::from_f64(n).map(Value::Number).ok_or_else(|| format!("{n} is not a finite number"))
}

/// Equality used by `=`, `!=`, `IN` and `BETWEEN`: numbers compare by value,
/// exactly when both are integers, everything else structurally.
pub fn loose_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => ValueOrder::compare_numbers(l, r).is_eq(),
        _ => left == right,
    }
}

fn order(left: &Value, right: &Value) -> Result<Ordering, String> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok(ValueOrder::compare_numbers(l, r)),
        (Value::String(l), Value::String(r)) => Ok(l.cmp(r)),
        _ => Err(format!(
            "cannot compare {} with {}",
            ValueKind::of_value(left),
            ValueKind::of_value(right)
        )),
    }
}

/// Evaluate a comparison operator.
pub fn compare(op: &BinaryOperator, left: &Value, right: &Value) -> Result<bool, String> {
    match op {
        BinaryOperator::Eq => Ok(loose_equal(left, right)),
        BinaryOperator::NotEq => Ok(!loose_equal(left, right)),
        BinaryOperator::Lt => order(left, right).map(Ordering::is_lt),
        BinaryOperator::LtEq => order(left, right).map(Ordering::is_le),
        BinaryOperator::Gt => order(left, right).map(Ordering::is_gt),
        BinaryOperator::GtEq => order(left, right).map(Ordering::is_ge),
        other => Err(format!("operator {other} is not a comparison")),
    }
}

pub fn is_comparison(op: &BinaryOperator) -> bool {
    matches!(
        op,
        BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::Lt
            | BinaryOperator::LtEq
            | BinaryOperator::Gt
            | BinaryOperator::GtEq
    )
}

pub fn is_arithmetic(op: &BinaryOperator) -> bool {
    matches!(
        op,
        BinaryOperator::Plus
            | BinaryOperator::Minus
            | BinaryOperator::Multiply
            | BinaryOperator::Divide
            | BinaryOperator::Modulo
    )
}

/// Evaluate `+ - * / %`. `+` also joins two strings.
pub fn arithmetic(op: &BinaryOperator, left: &Value, right: &Value) -> Result<Value, String> {
    if let (BinaryOperator::Plus, Value::String(l), Value::String(r)) = (op, left, right) {
        return Ok(Value::String(format!("{l}{r}")));
    }

    let (Some(l), Some(r)) = (as_number(left), as_number(right)) else {
        return Err(format!(
            "operator {op} needs numbers, got {} and {}",
            ValueKind::of_value(left),
            ValueKind::of_value(right)
        ));
    };

    let result = match op {
        BinaryOperator::Plus => l + r,
        BinaryOperator::Minus => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide | BinaryOperator::Modulo if r == 0.0 => {
            return Err("division by zero".to_string());
        }
        BinaryOperator::Divide => l / r,
        BinaryOperator::Modulo => l % r,
        other => return Err(format!("operator {other} is not arithmetic")),
    };
    number_value(result)
}

/// Translate a LIKE pattern (`%`, `_`, `escape`) into an anchored regex.
pub fn like_regex(pattern: &str, escape: char, case_insensitive: bool) -> Result<Regex, regex::Error> {
    let mut out = String::from("^");
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        if ch == escape {
            if let Some(escaped) = chars.next() {
                out.push_str(&regex::escape(&escaped.to_string()));
            }
            continue;
        }
        match ch {
            '%' => out.push_str(".*"),
            '_' => out.push('.'),
            c => out.push_str(&regex::escape(&c.to_string())),
        }
    }
    out.push('$');
    RegexBuilder::new(&out).dot_matches_new_line(true).case_insensitive(case_insensitive).build()
}
