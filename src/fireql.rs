use std::sync::Arc;

use crate::{
    context::Context,
    error::FireqlResult,
    executor::{QueryResult, SelectStatement},
    functions::FunctionRegistry,
    store::DocumentStore,
};

/// Entry point: runs SQL SELECT statements against a document store.
///
/// ```
/// use fireql::{Context, FireQL, MemoryStore};
/// use serde_json::json;
///
/// let store = MemoryStore::new();
/// let users = store.create("users").unwrap();
/// users.write().unwrap().add_batch(json!([{ "id": "1", "name": "Leanne" }]));
///
/// let fql = FireQL::new(Context::new("demo"), store);
/// let result = fql.execute("SELECT name FROM users").unwrap();
/// assert_eq!(result.records, vec![vec![json!("Leanne")]]);
/// ```
pub struct FireQL<S> {
    context: Context,
    store: S,
    registry: Arc<FunctionRegistry>,
}

impl<S: DocumentStore> FireQL<S> {
    pub fn new(context: Context, store: S) -> Self {
        Self { context, store, registry: FunctionRegistry::shared() }
    }

    pub fn with_registry(mut self, registry: Arc<FunctionRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Each call gets its own copy of the context.
    pub fn execute(&self, sql: &str) -> FireqlResult<QueryResult> {
        SelectStatement::new(self.context.clone(), sql).execute(&self.store, &self.registry)
    }
}
