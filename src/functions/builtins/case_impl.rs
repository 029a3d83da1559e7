use serde_json::Value;

use crate::{
    error::{FireqlError, FireqlResult},
    functions::ScalarFunction,
    store::ValueKind,
};

/// Shared body of the string functions: apply `f` to a single string argument.
pub(crate) fn map_string(name: &str, args: &[Value], f: impl Fn(&str) -> String) -> FireqlResult<Value> {
    match args.first() {
        Some(Value::String(s)) => Ok(Value::String(f(s))),
        Some(other) => FireqlError::UnsupportedOperand { function: name.into(), kind: ValueKind::of_value(other) }.err(),
        None => FireqlError::Arity { name: name.into(), required: 1, got: 0 }.err(),
    }
}

pub struct UpperImpl;

impl ScalarFunction for UpperImpl {
    fn name(&self) -> &'static str {
        "UPPER"
    }

    fn required_params(&self) -> usize {
        1
    }

    fn call(&self, args: &[Value]) -> FireqlResult<Value> {
        map_string(self.name(), args, str::to_uppercase)
    }
}

pub struct LowerImpl;

impl ScalarFunction for LowerImpl {
    fn name(&self) -> &'static str {
        "LOWER"
    }

    fn required_params(&self) -> usize {
        1
    }

    fn call(&self, args: &[Value]) -> FireqlResult<Value> {
        map_string(self.name(), args, str::to_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn changes_case_of_strings_only() {
        assert_eq!(UpperImpl.call(&[json!("Glendale")]).unwrap(), json!("GLENDALE"));
        assert_eq!(LowerImpl.call(&[json!("Glendale")]).unwrap(), json!("glendale"));
        assert!(matches!(UpperImpl.call(&[json!(3)]), Err(FireqlError::UnsupportedOperand { .. })));
    }
}
