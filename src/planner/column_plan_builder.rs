use sqlparser::ast::{Expr, FunctionArg, FunctionArgExpr, FunctionArguments, SelectItem};
use tracing::debug;

use crate::{
    error::{FireqlError, FireqlResult},
    expression::{column_path, function_name, ExpressionEvaluator},
    functions::FunctionRegistry,
    planner::{ColumnPlan, SelectColumn},
};

/// Turns a SELECT column list into a [`ColumnPlan`].
pub struct ColumnPlanBuilder<'a> {
    registry: &'a FunctionRegistry,
}

impl<'a> ColumnPlanBuilder<'a> {
    pub fn new(registry: &'a FunctionRegistry) -> Self {
        Self { registry }
    }

    pub fn build(&self, projection: &[SelectItem]) -> FireqlResult<ColumnPlan> {
        let columns = projection.iter().map(|item| self.plan_item(item)).collect::<FireqlResult<Vec<_>>>()?;
        let plan = ColumnPlan::new(columns);
        debug!(
            target: "fireql::plan",
            columns = plan.columns.len(),
            star = plan.has_star(),
            fields = ?plan.fields,
            "planned select columns"
        );
        Ok(plan)
    }

    fn plan_item(&self, item: &SelectItem) -> FireqlResult<SelectColumn> {
        match item {
            SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(..) => Ok(SelectColumn::Star),
            SelectItem::UnnamedExpr(expr) => self.plan_expr(expr, None),
            SelectItem::ExprWithAlias { expr, alias } => self.plan_expr(expr, Some(alias.value.clone())),
        }
    }

    /// Plan one column expression. A column reference is a field, a function
    /// call is a function column, anything else is computed.
    pub fn plan_expr(&self, expr: &Expr, alias: Option<String>) -> FireqlResult<SelectColumn> {
        if let Some(path) = column_path(expr) {
            return Ok(SelectColumn::new_field(path, alias));
        }

        match expr {
            Expr::Function(function) => {
                let name = function_name(&function.name);
                let args = match &function.args {
                    FunctionArguments::None => Vec::new(),
                    FunctionArguments::List(list) => {
                        if list.duplicate_treatment.is_some() || !list.clauses.is_empty() {
                            return FireqlError::unsupported_clause(expr).err();
                        }
                        list.args.iter().map(|arg| self.plan_arg(arg)).collect::<FireqlResult<Vec<_>>>()?
                    }
                    FunctionArguments::Subquery(_) => {
                        return FireqlError::unsupported_clause(format!("subquery in {name}")).err();
                    }
                };
                self.registry.validate(&name, args.len())?;
                let alias = alias.unwrap_or_else(|| name.clone());
                Ok(SelectColumn::Function { name, alias, args })
            }
            _ => {
                let source = expr.to_string();
                let expression = ExpressionEvaluator::new(self.registry).compile_ast(source.clone(), expr.clone())?;
                let vars = expression.variables().iter().map(|v| SelectColumn::new_field(v.clone(), None)).collect();
                Ok(SelectColumn::Expr { expression, alias: alias.unwrap_or(source), vars })
            }
        }
    }

    fn plan_arg(&self, arg: &FunctionArg) -> FireqlResult<SelectColumn> {
        match arg {
            FunctionArg::Unnamed(FunctionArgExpr::Expr(expr)) => self.plan_expr(expr, None),
            other => FireqlError::unsupported_clause(format!("function argument {other}")).err(),
        }
    }
}
