use serde_json::Value;

use crate::{
    error::{FireqlError, FireqlResult},
    functions::ScalarFunction,
    store::ValueKind,
};

/// `LENGTH(x)`: characters of a string, items of a list or entries of a map,
/// always as a float.
pub struct LengthImpl;

impl ScalarFunction for LengthImpl {
    fn name(&self) -> &'static str {
        "LENGTH"
    }

    fn required_params(&self) -> usize {
        1
    }

    fn call(&self, args: &[Value]) -> FireqlResult<Value> {
        let len = match args.first() {
            Some(Value::String(s)) => s.chars().count(),
            Some(Value::Array(items)) => items.len(),
            Some(Value::Object(map)) => map.len(),
            Some(other) => {
                return FireqlError::UnsupportedOperand { function: self.name().into(), kind: ValueKind::of_value(other) }
                    .err();
            }
            None => return FireqlError::Arity { name: self.name().into(), required: 1, got: 0 }.err(),
        };
        Ok(Value::from(len as f64))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn counts_sized_values() {
        assert_eq!(LengthImpl.call(&[json!("ckensley")]).unwrap(), json!(8.0));
        assert_eq!(LengthImpl.call(&[json!("ação")]).unwrap(), json!(4.0));
        assert_eq!(LengthImpl.call(&[json!([1, 2, 3])]).unwrap(), json!(3.0));
        assert_eq!(LengthImpl.call(&[json!({ "a": 1, "b": 2 })]).unwrap(), json!(2.0));
    }

    #[test]
    fn unsized_values_are_rejected() {
        for value in [json!(12), json!(true), json!(null)] {
            let err = LengthImpl.call(&[value]).unwrap_err();
            assert!(matches!(err, FireqlError::UnsupportedOperand { .. }));
        }
        let err = LengthImpl.call(&[json!(1.5)]).unwrap_err();
        assert_eq!(err.to_string(), "LENGTH of type \"float\" is not supported");
    }
}
