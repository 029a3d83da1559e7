use sqlparser::{
    ast::{SetExpr, Statement},
    dialect::MySqlDialect,
    parser::Parser,
};
use tracing::debug;

use crate::{
    compiler::ClauseCompiler,
    context::Context,
    error::{FireqlError, FireqlResult},
    executor::{QueryResult, ResultProjector},
    functions::FunctionRegistry,
    planner::ColumnPlanBuilder,
    store::DocumentStore,
};

/// One SELECT execution: parse, plan, compile, fetch, project.
pub struct SelectStatement {
    context: Context,
    raw_query: String,
}

impl SelectStatement {
    pub fn new(context: Context, raw_query: impl Into<String>) -> Self {
        Self { context, raw_query: raw_query.into() }
    }

    pub fn execute<S: DocumentStore + ?Sized>(&self, store: &S, registry: &FunctionRegistry) -> FireqlResult<QueryResult> {
        let statements = Parser::parse_sql(&MySqlDialect {}, &self.raw_query)?;
        let [statement] = statements.as_slice() else {
            return FireqlError::UnsupportedStatement(format!("batch of {}", statements.len())).err();
        };
        let Statement::Query(query) = statement else {
            return FireqlError::UnsupportedStatement(self.statement_kind()).err();
        };
        if query.with.is_some() {
            return FireqlError::unsupported_clause("WITH").err();
        }
        let select = match query.body.as_ref() {
            SetExpr::Select(select) => select,
            SetExpr::SetOperation { op, .. } => return FireqlError::UnsupportedStatement(op.to_string().to_uppercase()).err(),
            _ => return FireqlError::UnsupportedStatement(self.statement_kind()).err(),
        };

        let plan = ColumnPlanBuilder::new(registry).build(&select.projection)?;
        let store_query = ClauseCompiler::new(&self.context).compile(select, query)?.select(plan.fields.clone());
        let session = self.context.session()?;

        debug!(
            target: "fireql::project",
            project = %session.project_id,
            collection = store_query.target.name(),
            "executing select"
        );
        let stream = store.documents(&session, &store_query)?;
        ResultProjector::new(registry).project(stream, plan.columns)
    }

    /// Leading keyword of the raw statement.
    fn statement_kind(&self) -> String {
        self.raw_query.split_whitespace().next().unwrap_or_default().to_uppercase()
    }
}
