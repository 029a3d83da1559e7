use indexmap::IndexMap;
use serde_json::Value;
use sqlparser::ast::{BinaryOperator, Expr, FunctionArg, FunctionArgExpr, FunctionArguments, UnaryOperator, Value as SqlValue};

use crate::{
    error::{FireqlError, FireqlResult},
    expression::{arithmetic, column_path, compare, function_name, is_arithmetic, is_comparison, like_escape, like_regex, literal_value, loose_equal, number_value},
    functions::FunctionRegistry,
    store::ValueKind,
};

/// Variable bindings for one evaluation, keyed by field path.
pub type Variables = IndexMap<String, Value>;

/// A parsed and validated expression, ready to run against many rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: String,
    variables: Vec<String>,
    ast: Expr,
}

impl CompiledExpression {
    pub(crate) fn new(source: String, variables: Vec<String>, ast: Expr) -> Self {
        Self { source, variables, ast }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Free variables in source order, without duplicates.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn evaluate(&self, registry: &FunctionRegistry, vars: &Variables) -> FireqlResult<Value> {
        Interpreter { registry, vars, source: &self.source }.eval(&self.ast)
    }
}

struct Interpreter<'a> {
    registry: &'a FunctionRegistry,
    vars: &'a Variables,
    source: &'a str,
}

impl Interpreter<'_> {
    fn fail(&self, message: impl ToString) -> FireqlError {
        FireqlError::expression_eval(self.source, message)
    }

    fn boolean(&self, value: Value, what: &str) -> FireqlResult<bool> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(self.fail(format!("{what} needs a boolean, got {}", ValueKind::of_value(&other)))),
        }
    }

    fn string(&self, value: Value, what: &str) -> FireqlResult<String> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(self.fail(format!("{what} needs a string, got {}", ValueKind::of_value(&other)))),
        }
    }

    fn eval(&self, expr: &Expr) -> FireqlResult<Value> {
        if let Some(path) = column_path(expr) {
            return self
                .vars
                .get(&path)
                .cloned()
                .ok_or_else(|| self.fail(format!("no value bound to variable {path}")));
        }

        match expr {
            Expr::Value(v) => literal_value(&v.value).map_err(|m| self.fail(m)),
            Expr::Nested(inner) => self.eval(inner),

            Expr::UnaryOp { op, expr } => {
                let value = self.eval(expr)?;
                match op {
                    UnaryOperator::Not => Ok(Value::Bool(!self.boolean(value, "NOT")?)),
                    UnaryOperator::Minus => match value.as_f64() {
                        Some(n) => number_value(-n).map_err(|m| self.fail(m)),
                        None => Err(self.fail(format!("cannot negate {}", ValueKind::of_value(&value)))),
                    },
                    UnaryOperator::Plus if value.is_number() => Ok(value),
                    other => Err(self.fail(format!("unsupported unary operator {other}"))),
                }
            }

            Expr::BinaryOp { left, op, right } => match op {
                BinaryOperator::And => {
                    if !self.boolean(self.eval(left)?, "AND")? {
                        return Ok(Value::Bool(false));
                    }
                    Ok(Value::Bool(self.boolean(self.eval(right)?, "AND")?))
                }
                BinaryOperator::Or => {
                    if self.boolean(self.eval(left)?, "OR")? {
                        return Ok(Value::Bool(true));
                    }
                    Ok(Value::Bool(self.boolean(self.eval(right)?, "OR")?))
                }
                BinaryOperator::Xor => {
                    let l = self.boolean(self.eval(left)?, "XOR")?;
                    let r = self.boolean(self.eval(right)?, "XOR")?;
                    Ok(Value::Bool(l ^ r))
                }
                op if is_comparison(op) => {
                    let (l, r) = (self.eval(left)?, self.eval(right)?);
                    compare(op, &l, &r).map(Value::Bool).map_err(|m| self.fail(m))
                }
                op if is_arithmetic(op) => {
                    let (l, r) = (self.eval(left)?, self.eval(right)?);
                    arithmetic(op, &l, &r).map_err(|m| self.fail(m))
                }
                other => Err(self.fail(format!("unsupported operator {other}"))),
            },

            Expr::IsNull(inner) => Ok(Value::Bool(self.eval(inner)?.is_null())),
            Expr::IsNotNull(inner) => Ok(Value::Bool(!self.eval(inner)?.is_null())),
            Expr::IsTrue(inner) => Ok(Value::Bool(self.eval(inner)? == Value::Bool(true))),
            Expr::IsNotTrue(inner) => Ok(Value::Bool(self.eval(inner)? != Value::Bool(true))),
            Expr::IsFalse(inner) => Ok(Value::Bool(self.eval(inner)? == Value::Bool(false))),
            Expr::IsNotFalse(inner) => Ok(Value::Bool(self.eval(inner)? != Value::Bool(false))),

            Expr::InList { expr, list, negated } => {
                let value = self.eval(expr)?;
                let mut found = false;
                for item in list {
                    if loose_equal(&value, &self.eval(item)?) {
                        found = true;
                        break;
                    }
                }
                Ok(Value::Bool(found != *negated))
            }

            Expr::Between { expr, negated, low, high } => {
                let value = self.eval(expr)?;
                let (low, high) = (self.eval(low)?, self.eval(high)?);
                let inside = compare(&BinaryOperator::GtEq, &value, &low).map_err(|m| self.fail(m))?
                    && compare(&BinaryOperator::LtEq, &value, &high).map_err(|m| self.fail(m))?;
                Ok(Value::Bool(inside != *negated))
            }

            Expr::Like { negated, expr, pattern, escape_char, .. } => {
                self.like(expr, pattern, escape_char.as_ref(), *negated, false)
            }
            Expr::ILike { negated, expr, pattern, escape_char, .. } => {
                self.like(expr, pattern, escape_char.as_ref(), *negated, true)
            }

            Expr::RLike { negated, expr, pattern, .. } => {
                let text = self.string(self.eval(expr)?, "REGEXP")?;
                let pattern = self.string(self.eval(pattern)?, "REGEXP")?;
                let re = regex::Regex::new(&pattern).map_err(|e| self.fail(e))?;
                Ok(Value::Bool(re.is_match(&text) != *negated))
            }

            Expr::Function(function) => {
                let mut args = Vec::new();
                if let FunctionArguments::List(list) = &function.args {
                    for arg in &list.args {
                        match arg {
                            FunctionArg::Unnamed(FunctionArgExpr::Expr(e)) => args.push(self.eval(e)?),
                            other => return Err(self.fail(format!("unsupported function argument {other}"))),
                        }
                    }
                }
                self.registry.call(&function_name(&function.name), &args)
            }

            other => Err(self.fail(format!("unsupported expression {other}"))),
        }
    }

    fn like(
        &self,
        expr: &Expr,
        pattern: &Expr,
        escape: Option<&SqlValue>,
        negated: bool,
        case_insensitive: bool,
    ) -> FireqlResult<Value> {
        let text = self.string(self.eval(expr)?, "LIKE")?;
        let pattern = self.string(self.eval(pattern)?, "LIKE")?;
        let escape = like_escape(escape).map_err(|m| self.fail(m))?;
        let re = like_regex(&pattern, escape, case_insensitive).map_err(|e| self.fail(e))?;
        Ok(Value::Bool(re.is_match(&text) != negated))
    }
}
