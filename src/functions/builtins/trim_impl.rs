use serde_json::Value;

use crate::{error::FireqlResult, functions::{builtins::case_impl::map_string, ScalarFunction}};

pub struct TrimImpl;

impl ScalarFunction for TrimImpl {
    fn name(&self) -> &'static str {
        "TRIM"
    }

    fn required_params(&self) -> usize {
        1
    }

    fn call(&self, args: &[Value]) -> FireqlResult<Value> {
        map_string(self.name(), args, |s| s.trim().to_string())
    }
}
