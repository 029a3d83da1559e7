use serde_json::Value;
use sqlparser::ast::{
    BinaryOperator, Expr, GroupByExpr, LimitClause, ObjectNamePart, OrderByKind, Query, Select, TableFactor,
};
use tracing::{trace, warn};

use crate::{
    compiler::LiteralConverter,
    context::Context,
    error::{FireqlError, FireqlResult},
    expression::column_path,
    store::{CollectionRef, Direction, FilterOp, StoreQuery},
};

/// Compiles FROM, WHERE, ORDER BY and LIMIT into a [`StoreQuery`].
pub struct ClauseCompiler<'a> {
    context: &'a Context,
}

impl<'a> ClauseCompiler<'a> {
    pub fn new(context: &'a Context) -> Self {
        Self { context }
    }

    pub fn compile(&self, select: &Select, query: &Query) -> FireqlResult<StoreQuery> {
        Self::reject_unsupported(select)?;

        let mut store_query = StoreQuery::new(Self::target(select)?);
        if let Some(selection) = &select.selection {
            store_query = Self::where_expr(store_query, selection)?;
        }
        store_query = Self::order_by(store_query, query)?;
        store_query.limit = self.limit(query)?;

        trace!(target: "fireql::compile", query = ?store_query, "compiled store query");
        Ok(store_query)
    }

    fn reject_unsupported(select: &Select) -> FireqlResult<()> {
        if select.distinct.is_some() {
            return FireqlError::unsupported_clause("DISTINCT").err();
        }
        let grouped = match &select.group_by {
            GroupByExpr::All(_) => true,
            GroupByExpr::Expressions(exprs, _) => !exprs.is_empty(),
        };
        if grouped || select.having.is_some() {
            return FireqlError::unsupported_clause("GROUP BY").err();
        }
        Ok(())
    }

    /// Collection named by the single FROM target. `` `[name]` `` targets a
    /// collection group.
    pub fn target(select: &Select) -> FireqlResult<CollectionRef> {
        let [from] = select.from.as_slice() else {
            return FireqlError::MissingFromClause.err();
        };
        if !from.joins.is_empty() {
            return FireqlError::unsupported_clause("JOIN").err();
        }
        let TableFactor::Table { name, .. } = &from.relation else {
            return FireqlError::unsupported_clause(format!("FROM {}", from.relation)).err();
        };
        let name = match name.0.last() {
            Some(ObjectNamePart::Identifier(ident)) => ident.value.clone(),
            _ => name.to_string().trim_matches('`').to_string(),
        };

        match name.strip_prefix('[').and_then(|n| n.strip_suffix(']')) {
            Some(group) => Ok(CollectionRef::Group(group.to_string())),
            None => Ok(CollectionRef::Collection(name)),
        }
    }

    fn where_expr(query: StoreQuery, expr: &Expr) -> FireqlResult<StoreQuery> {
        match expr {
            Expr::Nested(inner) => Self::where_expr(query, inner),
            Expr::BinaryOp { left, op: BinaryOperator::And, right } => {
                let query = Self::where_expr(query, left)?;
                Self::where_expr(query, right)
            }
            Expr::BinaryOp { left, op, right } => {
                let op = Self::filter_op(op).ok_or_else(|| FireqlError::unsupported_clause(expr))?;
                let field = Self::field(left, expr)?;
                Ok(Self::filter(query, field, op, LiteralConverter::convert(right)?))
            }
            Expr::InList { expr: left, list, negated } => {
                let field = Self::field(left, expr)?;
                let values = list.iter().map(LiteralConverter::convert).collect::<FireqlResult<Vec<_>>>()?;
                let op = if *negated { FilterOp::NotIn } else { FilterOp::In };
                Ok(Self::filter(query, field, op, Value::Array(values)))
            }
            Expr::IsNull(left) => Ok(Self::filter(query, Self::field(left, expr)?, FilterOp::Equal, Value::Null)),
            Expr::IsNotNull(left) => Ok(Self::filter(query, Self::field(left, expr)?, FilterOp::NotEqual, Value::Null)),
            other => FireqlError::unsupported_clause(other).err(),
        }
    }

    /// The left operand of a predicate must be a plain column.
    fn field(left: &Expr, predicate: &Expr) -> FireqlResult<String> {
        column_path(left).ok_or_else(|| FireqlError::unsupported_clause(predicate))
    }

    fn filter(query: StoreQuery, field: String, op: FilterOp, value: Value) -> StoreQuery {
        trace!(target: "fireql::compile", %field, %op, %value, "where");
        query.filter(field, op, value)
    }

    /// SQL comparison to store operator. `=` becomes `==`, the rest keep
    /// their meaning.
    pub fn filter_op(op: &BinaryOperator) -> Option<FilterOp> {
        let op = match op {
            BinaryOperator::Eq => FilterOp::Equal,
            BinaryOperator::NotEq => FilterOp::NotEqual,
            BinaryOperator::Lt => FilterOp::LessThan,
            BinaryOperator::LtEq => FilterOp::LessThanOrEqual,
            BinaryOperator::Gt => FilterOp::GreaterThan,
            BinaryOperator::GtEq => FilterOp::GreaterThanOrEqual,
            _ => return None,
        };
        Some(op)
    }

    fn order_by(mut store_query: StoreQuery, query: &Query) -> FireqlResult<StoreQuery> {
        let Some(order_by) = &query.order_by else {
            return Ok(store_query);
        };
        let OrderByKind::Expressions(exprs) = &order_by.kind else {
            return FireqlError::unsupported_clause("ORDER BY ALL").err();
        };
        for order in exprs {
            let field = column_path(&order.expr).ok_or_else(|| FireqlError::unsupported_clause(&order.expr))?;
            let direction = if order.options.asc == Some(false) { Direction::Desc } else { Direction::Asc };
            trace!(target: "fireql::compile", %field, ?direction, "order by");
            store_query = store_query.order_by(field, direction);
        }
        Ok(store_query)
    }

    /// Explicit LIMIT, else the context default. Offsets are dropped.
    fn limit(&self, query: &Query) -> FireqlResult<Option<usize>> {
        let (limit, offset) = match &query.limit_clause {
            None => (None, false),
            Some(LimitClause::LimitOffset { limit, offset, limit_by }) => {
                if !limit_by.is_empty() {
                    return FireqlError::unsupported_clause("LIMIT BY").err();
                }
                (limit.as_ref(), offset.is_some())
            }
            Some(LimitClause::OffsetCommaLimit { limit, .. }) => (Some(limit), true),
        };

        if offset {
            warn!(target: "fireql::compile", "OFFSET is not supported by the store and is ignored");
        }

        match limit {
            Some(expr) => Self::limit_value(expr).map(Some),
            None => Ok(self.context.limit()),
        }
    }

    fn limit_value(expr: &Expr) -> FireqlResult<usize> {
        match LiteralConverter::convert(expr)? {
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| FireqlError::ValueConversion(format!("LIMIT {n}"))),
            other => FireqlError::ValueConversion(format!("LIMIT {other}")).err(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sqlparser::{
        ast::{SetExpr, Statement},
        dialect::MySqlDialect,
        parser::Parser,
    };

    use super::*;
    use crate::store::Filter;

    fn compile_with(context: &Context, sql: &str) -> FireqlResult<StoreQuery> {
        let statements = Parser::parse_sql(&MySqlDialect {}, sql).unwrap();
        let Statement::Query(query) = &statements[0] else { panic!("not a query") };
        let SetExpr::Select(select) = query.body.as_ref() else { panic!("not a select") };
        ClauseCompiler::new(context).compile(select, query)
    }

    fn compile(sql: &str) -> FireqlResult<StoreQuery> {
        compile_with(&Context::new("test"), sql)
    }

    #[test]
    fn conjunctive_where_becomes_filters() {
        let q = compile("SELECT * FROM users WHERE id > 3 AND `address.city` = 'Gwenborough' AND active != false").unwrap();
        assert_eq!(q.target, CollectionRef::Collection("users".into()));
        assert_eq!(
            q.filters,
            vec![
                Filter::new("id", FilterOp::GreaterThan, json!(3)),
                Filter::new("address.city", FilterOp::Equal, json!("Gwenborough")),
                Filter::new("active", FilterOp::NotEqual, json!(false)),
            ]
        );
    }

    #[test]
    fn membership_and_null_checks() {
        let q = compile("SELECT * FROM users WHERE id IN (1, 2) AND name NOT IN ('a') AND email IS NOT NULL AND phone IS NULL AND x <> 1.5").unwrap();
        let ops: Vec<String> = q.filters.iter().map(|f| f.op.to_string()).collect();
        assert_eq!(ops, vec!["in", "not-in", "!=", "==", "!="]);
        assert_eq!(q.filters[0].value, json!([1, 2]));
        assert_eq!(q.filters[2].value, json!(null));
    }

    #[test]
    fn disjunctions_and_negations_are_rejected() {
        assert!(matches!(compile("SELECT * FROM t WHERE a = 1 OR b = 2"), Err(FireqlError::UnsupportedClause(_))));
        assert!(matches!(compile("SELECT * FROM t WHERE NOT a = 1"), Err(FireqlError::UnsupportedClause(_))));
        assert!(matches!(compile("SELECT * FROM t WHERE a LIKE 'x%'"), Err(FireqlError::UnsupportedClause(_))));
        assert!(matches!(compile("SELECT * FROM t WHERE 1 = a"), Err(FireqlError::UnsupportedClause(_))));
        assert!(matches!(compile("SELECT * FROM t WHERE a = b + 1"), Err(FireqlError::ValueConversion(_))));
    }

    #[test]
    fn order_by_keeps_clause_order() {
        let q = compile("SELECT * FROM t ORDER BY a DESC, `b.c`, d ASC").unwrap();
        let keys: Vec<_> = q.order_by.iter().map(|o| (o.field.as_str(), o.direction)).collect();
        assert_eq!(keys, vec![("a", Direction::Desc), ("b.c", Direction::Asc), ("d", Direction::Asc)]);
        assert!(matches!(compile("SELECT * FROM t ORDER BY LENGTH(a)"), Err(FireqlError::UnsupportedClause(_))));
    }

    #[test]
    fn limit_and_default_limit() {
        let ctx = Context::new("test").with_default_limit(50);
        assert_eq!(compile_with(&ctx, "SELECT * FROM t").unwrap().limit, Some(50));
        assert_eq!(compile_with(&ctx, "SELECT * FROM t LIMIT 5").unwrap().limit, Some(5));
        assert_eq!(compile_with(&ctx, "SELECT * FROM t LIMIT 0").unwrap().limit, Some(0));
        assert_eq!(compile("SELECT * FROM t").unwrap().limit, None);
    }

    #[test]
    fn offsets_are_ignored() {
        assert_eq!(compile("SELECT * FROM t LIMIT 5 OFFSET 10").unwrap().limit, Some(5));
        assert_eq!(compile("SELECT * FROM t LIMIT 10, 5").unwrap().limit, Some(5));
    }

    #[test]
    fn from_targets() {
        assert_eq!(compile("SELECT * FROM `[orders]`").unwrap().target, CollectionRef::Group("orders".into()));
        assert_eq!(
            compile("SELECT * FROM `users/1/orders`").unwrap().target,
            CollectionRef::Collection("users/1/orders".into())
        );
        assert!(matches!(compile("SELECT 1"), Err(FireqlError::MissingFromClause)));
        assert!(matches!(compile("SELECT * FROM a, b"), Err(FireqlError::MissingFromClause)));
        assert!(matches!(compile("SELECT * FROM a JOIN b ON a.id = b.id"), Err(FireqlError::UnsupportedClause(_))));
    }

    #[test]
    fn aggregation_clauses_are_rejected() {
        assert!(matches!(compile("SELECT a FROM t GROUP BY a"), Err(FireqlError::UnsupportedClause(_))));
        assert!(matches!(compile("SELECT DISTINCT a FROM t"), Err(FireqlError::UnsupportedClause(_))));
    }
}
