use serde_json::Value;
use tracing::debug;

use crate::{
    error::{FireqlError, FireqlResult},
    executor::QueryResult,
    expression::Variables,
    functions::FunctionRegistry,
    planner::SelectColumn,
    store::{Document, DocumentStream},
};

/// Builds the tabular result from a document stream and a column plan.
pub struct ResultProjector<'a> {
    registry: &'a FunctionRegistry,
}

impl<'a> ResultProjector<'a> {
    pub fn new(registry: &'a FunctionRegistry) -> Self {
        Self { registry }
    }

    /// Drain `stream`, resolving every column against every document.
    ///
    /// Wildcards expand to the keys of the first document. An empty stream
    /// yields the unexpanded column names and no rows. The first resolution
    /// failure aborts the projection.
    pub fn project(&self, mut stream: DocumentStream<'_>, columns: Vec<SelectColumn>) -> FireqlResult<QueryResult> {
        let first = match stream.next() {
            Some(document) => document?,
            None => {
                debug!(target: "fireql::project", "empty document stream");
                return Ok(QueryResult::new(Self::names(&columns), Vec::new()));
            }
        };

        let columns = Self::expand_star(columns, &first);
        let names = Self::names(&columns);

        let mut records = vec![self.row(&first, &columns)?];
        for document in stream {
            records.push(self.row(&document?, &columns)?);
        }

        debug!(target: "fireql::project", columns = names.len(), rows = records.len(), "projected result");
        Ok(QueryResult::new(names, records))
    }

    /// Replace each wildcard with one field column per key of `first`,
    /// keeping the surrounding columns where they were.
    pub fn expand_star(columns: Vec<SelectColumn>, first: &Document) -> Vec<SelectColumn> {
        if !columns.iter().any(SelectColumn::is_star) {
            return columns;
        }

        let mut expanded = Vec::with_capacity(columns.len() + first.data.len());
        for column in columns {
            match column {
                SelectColumn::Star => {
                    debug!(target: "fireql::project", document = %first.id, keys = first.data.len(), "expanding *");
                    expanded.extend(first.keys().map(|key| SelectColumn::new_field(key.clone(), None)));
                }
                other => expanded.push(other),
            }
        }
        expanded
    }

    fn names(columns: &[SelectColumn]) -> Vec<String> {
        columns.iter().filter_map(|c| c.alias().map(str::to_string)).collect()
    }

    fn row(&self, document: &Document, columns: &[SelectColumn]) -> FireqlResult<Vec<Value>> {
        columns.iter().map(|column| self.resolve(document, column)).collect()
    }

    /// Value of one column for one document.
    pub fn resolve(&self, document: &Document, column: &SelectColumn) -> FireqlResult<Value> {
        match column {
            SelectColumn::Field { path, .. } => document.lookup(path).ok_or_else(|| FireqlError::UnknownField {
                field: path.clone(),
                document: document.id.clone(),
            }),
            SelectColumn::Function { name, args, .. } => {
                let args = args.iter().map(|arg| self.resolve(document, arg)).collect::<FireqlResult<Vec<_>>>()?;
                self.registry.call(name, &args)
            }
            SelectColumn::Expr { expression, vars, .. } => {
                let mut bindings = Variables::with_capacity(vars.len());
                for var in vars {
                    bindings.insert(var.field().to_string(), self.resolve(document, var)?);
                }
                expression.evaluate(self.registry, &bindings)
            }
            SelectColumn::Star => FireqlError::unsupported_clause("* used as a value").err(),
        }
    }
}
