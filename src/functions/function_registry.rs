use std::{
    collections::HashMap,
    sync::Arc,
};

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::{
    error::{FireqlError, FireqlResult},
    functions::{FnFunction, FunctionHandle, LengthImpl, LowerImpl, ScalarFunction, TrimImpl, UpperImpl},
};

static SHARED: Lazy<Arc<FunctionRegistry>> = Lazy::new(|| Arc::new(FunctionRegistry::with_builtins()));

/// Case-insensitive table of scalar functions.
///
/// Populated before the first query and only read afterwards; the same entry
/// serves function columns and calls inside expressions.
#[derive(Default, Clone)]
pub struct FunctionRegistry {
    by_name: HashMap<String, FunctionHandle>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self { by_name: HashMap::new() }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(LengthImpl);
        registry.register(UpperImpl);
        registry.register(LowerImpl);
        registry.register(TrimImpl);
        registry
    }

    /// Process-wide registry holding the builtins.
    pub fn shared() -> Arc<FunctionRegistry> {
        Arc::clone(&SHARED)
    }

    pub fn register<F: ScalarFunction + 'static>(&mut self, function: F) {
        self.by_name.insert(function.name().to_ascii_uppercase(), Arc::new(function));
    }

    pub fn register_fn<F>(&mut self, name: &'static str, required: usize, body: F)
    where
        F: Fn(&[Value]) -> FireqlResult<Value> + Send + Sync + 'static,
    {
        self.register(FnFunction::new(name, required, body));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_ascii_uppercase())
    }

    pub fn resolve(&self, name: &str) -> FireqlResult<FunctionHandle> {
        self.by_name
            .get(&name.to_ascii_uppercase())
            .cloned()
            .ok_or_else(|| FireqlError::UnknownFunction(name.to_string()))
    }

    /// Fails when `name` is unknown or `arg_count` is below its arity.
    pub fn validate(&self, name: &str, arg_count: usize) -> FireqlResult<FunctionHandle> {
        let function = self.resolve(name)?;
        let required = function.required_params();
        if arg_count < required {
            return FireqlError::Arity { name: name.to_string(), required, got: arg_count }.err();
        }
        Ok(function)
    }

    pub fn call(&self, name: &str, args: &[Value]) -> FireqlResult<Value> {
        self.validate(name, args.len())?.call(args)
    }

    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<_> = self.by_name.keys().cloned().collect();
        names.sort();
        names
    }

    /// Name to callable table handed to expression evaluation.
    pub fn eval_functions(&self) -> HashMap<String, FunctionHandle> {
        self.by_name.clone()
    }
}
