use std::sync::Arc;

use serde_json::Value;

use crate::error::FireqlResult;

/// A named scalar function callable from column lists and expressions.
/// Implementations are stateless and shared across threads.
pub trait ScalarFunction: Send + Sync {
    /// Canonical upper-case name ("LENGTH", "UPPER", ...).
    fn name(&self) -> &'static str;

    /// Minimum number of arguments a call must supply.
    fn required_params(&self) -> usize;

    fn call(&self, args: &[Value]) -> FireqlResult<Value>;
}

pub type FunctionHandle = Arc<dyn ScalarFunction>;

type Callable = dyn Fn(&[Value]) -> FireqlResult<Value> + Send + Sync;

/// Adapter turning a closure into a [`ScalarFunction`].
pub struct FnFunction {
    name: &'static str,
    required: usize,
    body: Box<Callable>,
}

impl FnFunction {
    pub fn new<F>(name: &'static str, required: usize, body: F) -> Self
    where
        F: Fn(&[Value]) -> FireqlResult<Value> + Send + Sync + 'static,
    {
        Self { name, required, body: Box::new(body) }
    }
}

impl ScalarFunction for FnFunction {
    fn name(&self) -> &'static str {
        self.name
    }

    fn required_params(&self) -> usize {
        self.required
    }

    fn call(&self, args: &[Value]) -> FireqlResult<Value> {
        (self.body)(args)
    }
}
