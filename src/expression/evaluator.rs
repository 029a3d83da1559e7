use serde_json::Value;
use sqlparser::{
    ast::{BinaryOperator, Expr, FunctionArg, FunctionArgExpr, FunctionArguments, ObjectName, ObjectNamePart, UnaryOperator, Value as SqlValue},
    dialect::MySqlDialect,
    parser::{Parser, ParserError},
    tokenizer::Token,
};

use crate::{
    error::{FireqlError, FireqlResult},
    expression::{is_arithmetic, is_comparison, number_value, CompiledExpression, Variables},
    functions::FunctionRegistry,
};

/// Field path named by a column reference: `id`, `` `address.city` `` or
/// `address.city`.
pub fn column_path(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Identifier(ident) => Some(ident.value.clone()),
        Expr::CompoundIdentifier(parts) => {
            Some(parts.iter().map(|p| p.value.as_str()).collect::<Vec<_>>().join("."))
        }
        _ => None,
    }
}

/// Function name as written, without quoting.
pub fn function_name(name: &ObjectName) -> String {
    match name.0.last() {
        Some(ObjectNamePart::Identifier(ident)) => ident.value.clone(),
        _ => name.to_string(),
    }
}

/// Scalar value of an SQL literal. Numbers become floats.
pub fn literal_value(value: &SqlValue) -> Result<Value, String> {
    match value {
        SqlValue::Number(n, _) => n
            .parse::<f64>()
            .map_err(|_| format!("invalid number {n}"))
            .and_then(number_value),
        SqlValue::SingleQuotedString(s) | SqlValue::DoubleQuotedString(s) => Ok(Value::String(s.clone())),
        SqlValue::Boolean(b) => Ok(Value::Bool(*b)),
        SqlValue::Null => Ok(Value::Null),
        other => Err(format!("unsupported literal {other}")),
    }
}

/// `ESCAPE` character of a LIKE. Backslash when none is given.
pub fn like_escape(escape: Option<&SqlValue>) -> Result<char, String> {
    let Some(value) = escape else {
        return Ok('\\');
    };
    if let SqlValue::SingleQuotedString(s) | SqlValue::DoubleQuotedString(s) = value {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(c);
        }
    }
    Err(format!("ESCAPE needs a single character, got {value}"))
}

/// Parses and runs expressions whose function calls resolve through a
/// [`FunctionRegistry`].
pub struct ExpressionEvaluator<'a> {
    registry: &'a FunctionRegistry,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(registry: &'a FunctionRegistry) -> Self {
        Self { registry }
    }

    pub fn compile(&self, source: &str) -> FireqlResult<CompiledExpression> {
        let dialect = MySqlDialect {};
        let parse_err = |e: ParserError| FireqlError::expression_parse(source, e);

        let mut parser = Parser::new(&dialect).try_with_sql(source).map_err(parse_err)?;
        let ast = parser.parse_expr().map_err(parse_err)?;
        parser.expect_token(&Token::EOF).map_err(parse_err)?;

        self.compile_ast(source, ast)
    }

    /// Validate an already parsed expression and collect its variables.
    pub fn compile_ast(&self, source: impl Into<String>, ast: Expr) -> FireqlResult<CompiledExpression> {
        let source = source.into();
        let mut variables = Vec::new();
        self.analyze(&source, &ast, &mut variables)?;
        Ok(CompiledExpression::new(source, variables, ast))
    }

    pub fn evaluate(&self, source: &str, vars: &Variables) -> FireqlResult<Value> {
        self.compile(source)?.evaluate(self.registry, vars)
    }

    fn analyze(&self, source: &str, expr: &Expr, vars: &mut Vec<String>) -> FireqlResult<()> {
        let unsupported = |what: String| Err(FireqlError::expression_parse(source, what));

        if let Some(path) = column_path(expr) {
            if !vars.contains(&path) {
                vars.push(path);
            }
            return Ok(());
        }

        match expr {
            Expr::Value(v) => literal_value(&v.value).map(|_| ()).or_else(unsupported),
            Expr::Nested(inner)
            | Expr::IsNull(inner)
            | Expr::IsNotNull(inner)
            | Expr::IsTrue(inner)
            | Expr::IsNotTrue(inner)
            | Expr::IsFalse(inner)
            | Expr::IsNotFalse(inner) => self.analyze(source, inner, vars),
            Expr::UnaryOp { op, expr } => match op {
                UnaryOperator::Not | UnaryOperator::Minus | UnaryOperator::Plus => self.analyze(source, expr, vars),
                other => unsupported(format!("unsupported unary operator {other}")),
            },
            Expr::BinaryOp { left, op, right } => {
                let known = matches!(op, BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Xor)
                    || is_comparison(op)
                    || is_arithmetic(op);
                if !known {
                    return unsupported(format!("unsupported operator {op}"));
                }
                self.analyze(source, left, vars)?;
                self.analyze(source, right, vars)
            }
            Expr::InList { expr, list, .. } => {
                self.analyze(source, expr, vars)?;
                list.iter().try_for_each(|item| self.analyze(source, item, vars))
            }
            Expr::Between { expr, low, high, .. } => {
                self.analyze(source, expr, vars)?;
                self.analyze(source, low, vars)?;
                self.analyze(source, high, vars)
            }
            Expr::Like { any, expr, pattern, escape_char, .. } | Expr::ILike { any, expr, pattern, escape_char, .. } => {
                if *any {
                    return unsupported("LIKE ANY is not supported".into());
                }
                like_escape(escape_char.as_ref()).map_err(|m| FireqlError::expression_parse(source, m))?;
                self.analyze(source, expr, vars)?;
                self.analyze(source, pattern, vars)
            }
            Expr::RLike { expr, pattern, .. } => {
                self.analyze(source, expr, vars)?;
                self.analyze(source, pattern, vars)
            }
            Expr::Function(function) => {
                let args: Vec<&Expr> = match &function.args {
                    FunctionArguments::None => Vec::new(),
                    FunctionArguments::List(list) => {
                        if list.duplicate_treatment.is_some() || !list.clauses.is_empty() {
                            return FireqlError::unsupported_clause(expr).err();
                        }
                        let mut args = Vec::with_capacity(list.args.len());
                        for arg in &list.args {
                            match arg {
                                FunctionArg::Unnamed(FunctionArgExpr::Expr(e)) => args.push(e),
                                other => return unsupported(format!("unsupported function argument {other}")),
                            }
                        }
                        args
                    }
                    FunctionArguments::Subquery(_) => return unsupported("subqueries are not supported".into()),
                };
                self.registry.validate(&function_name(&function.name), args.len())?;
                args.into_iter().try_for_each(|arg| self.analyze(source, arg, vars))
            }
            other => unsupported(format!("unsupported expression {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn vars(pairs: &[(&str, Value)]) -> Variables {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn variables_are_collected_in_order_without_duplicates() {
        let registry = FunctionRegistry::with_builtins();
        let ev = ExpressionEvaluator::new(&registry);
        let compiled = ev.compile("b + a * b > LENGTH(`address.city`) AND c.d = 1").unwrap();
        assert_eq!(compiled.variables(), ["b", "a", "address.city", "c.d"]);
    }

    #[test]
    fn comparisons_and_arithmetic() {
        let registry = FunctionRegistry::with_builtins();
        let ev = ExpressionEvaluator::new(&registry);
        assert_eq!(ev.evaluate("id > 0", &vars(&[("id", json!(3))])).unwrap(), json!(true));
        assert_eq!(ev.evaluate("id > 0", &vars(&[("id", json!(0))])).unwrap(), json!(false));
        assert_eq!(ev.evaluate("(a + b) * 2", &vars(&[("a", json!(1)), ("b", json!(2.5))])).unwrap(), json!(7.0));
        assert_eq!(ev.evaluate("-a % 3", &vars(&[("a", json!(7))])).unwrap(), json!(-1.0));
    }

    #[test]
    fn boolean_connectives_and_predicates() {
        let registry = FunctionRegistry::with_builtins();
        let ev = ExpressionEvaluator::new(&registry);
        let v = vars(&[("email", json!(null)), ("age", json!(30)), ("name", json!("Chelsey"))]);
        assert_eq!(ev.evaluate("email IS NULL AND age BETWEEN 18 AND 65", &v).unwrap(), json!(true));
        assert_eq!(ev.evaluate("NOT (age IN (1, 2, 30))", &v).unwrap(), json!(false));
        assert_eq!(ev.evaluate("name LIKE 'Ch_ls%'", &v).unwrap(), json!(true));
        assert_eq!(ev.evaluate("name REGEXP '^C.*y$'", &v).unwrap(), json!(true));
        assert_eq!(ev.evaluate("age > 40 OR name = 'Chelsey'", &v).unwrap(), json!(true));
        assert_eq!(ev.evaluate("true XOR false", &v).unwrap(), json!(true));
    }

    #[test]
    fn like_honours_the_escape_character() {
        let registry = FunctionRegistry::with_builtins();
        let ev = ExpressionEvaluator::new(&registry);
        let bret = vars(&[("username", json!("Bret")), ("rate", json!("50%"))]);
        assert_eq!(ev.evaluate("username LIKE 'B!ret' ESCAPE '!'", &bret).unwrap(), json!(true));
        assert_eq!(ev.evaluate("rate LIKE '50!%' ESCAPE '!'", &bret).unwrap(), json!(true));
        assert_eq!(ev.evaluate("username LIKE 'B!%' ESCAPE '!'", &bret).unwrap(), json!(false));
        assert_eq!(ev.evaluate("username NOT ILIKE 'b#ret' ESCAPE '#'", &bret).unwrap(), json!(false));
        assert!(matches!(ev.compile("username LIKE 'B' ESCAPE 'ab'"), Err(FireqlError::ExpressionParse { .. })));
    }

    #[test]
    fn non_finite_results_fail() {
        let registry = FunctionRegistry::with_builtins();
        let ev = ExpressionEvaluator::new(&registry);
        let v = vars(&[("id", json!(1))]);
        assert!(matches!(ev.evaluate("id * 1e308 * 10", &v), Err(FireqlError::ExpressionEval { .. })));
        assert!(matches!(ev.evaluate("-(id * 1e308 * 10)", &v), Err(FireqlError::ExpressionEval { .. })));
    }

    #[test]
    fn distinct_function_arguments_are_rejected() {
        let registry = FunctionRegistry::with_builtins();
        let ev = ExpressionEvaluator::new(&registry);
        assert!(matches!(ev.compile("LENGTH(DISTINCT name) > 1"), Err(FireqlError::UnsupportedClause(_))));
    }

    #[test]
    fn functions_share_the_registry() {
        let registry = FunctionRegistry::with_builtins();
        let ev = ExpressionEvaluator::new(&registry);
        let v = vars(&[("username", json!("Bret"))]);
        assert_eq!(ev.evaluate("LENGTH(username) * 2", &v).unwrap(), json!(8.0));
        assert_eq!(ev.evaluate("upper(username) = 'BRET'", &v).unwrap(), json!(true));
    }

    #[test]
    fn function_misuse_fails_at_compile_time() {
        let registry = FunctionRegistry::with_builtins();
        let ev = ExpressionEvaluator::new(&registry);
        assert!(matches!(ev.compile("NOPE(a)"), Err(FireqlError::UnknownFunction(_))));
        assert!(matches!(ev.compile("LENGTH()"), Err(FireqlError::Arity { .. })));
    }

    #[test]
    fn malformed_source_is_a_parse_error() {
        let registry = FunctionRegistry::with_builtins();
        let ev = ExpressionEvaluator::new(&registry);
        assert!(matches!(ev.compile("a >"), Err(FireqlError::ExpressionParse { .. })));
        assert!(matches!(ev.compile("a > 1 b"), Err(FireqlError::ExpressionParse { .. })));
        assert!(matches!(ev.compile("a & 1"), Err(FireqlError::ExpressionParse { .. })));
    }

    #[test]
    fn runtime_problems_are_eval_errors() {
        let registry = FunctionRegistry::with_builtins();
        let ev = ExpressionEvaluator::new(&registry);
        assert!(matches!(ev.evaluate("a / 0", &vars(&[("a", json!(1))])), Err(FireqlError::ExpressionEval { .. })));
        assert!(matches!(ev.evaluate("a + 1", &Variables::new()), Err(FireqlError::ExpressionEval { .. })));
        assert!(matches!(ev.evaluate("a AND true", &vars(&[("a", json!(1))])), Err(FireqlError::ExpressionEval { .. })));
    }
}
