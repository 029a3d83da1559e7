use sqlparser::parser::ParserError;
use thiserror::Error;

use crate::store::ValueKind;

/// Every failure a query execution can end with.
///
/// Errors are terminal: the first one raised aborts the whole query and no
/// partial result is returned.
#[derive(Debug, Error)]
pub enum FireqlError {
    #[error("parse error: {0}")]
    Parse(#[from] ParserError),

    #[error("unsupported sql statement {0}. supported queries: SELECT")]
    UnsupportedStatement(String),

    #[error("there must be a FROM collection")]
    MissingFromClause,

    #[error("unknown function \"{0}\"")]
    UnknownFunction(String),

    #[error("insufficient params to \"{name}\" function. expects {required} params, got {got}")]
    Arity { name: String, required: usize, got: usize },

    #[error("{function} of type \"{kind}\" is not supported")]
    UnsupportedOperand { function: String, kind: ValueKind },

    #[error("unsupported clause: {0}")]
    UnsupportedClause(String),

    #[error("couldn't convert value: {0}")]
    ValueConversion(String),

    #[error("unknown field \"{field}\" in doc \"{document}\"")]
    UnknownField { field: String, document: String },

    #[error("couldn't parse expression {expression}: {message}")]
    ExpressionParse { expression: String, message: String },

    #[error("couldn't evaluate expression {expression}: {message}")]
    ExpressionEval { expression: String, message: String },

    #[error("invalid service account, it is expected to be a JSON object: {0}")]
    InvalidCredentials(String),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl FireqlError {
    pub fn expression_parse(expression: &str, message: impl ToString) -> Self {
        FireqlError::ExpressionParse { expression: expression.to_string(), message: message.to_string() }
    }

    pub fn expression_eval(expression: &str, message: impl ToString) -> Self {
        FireqlError::ExpressionEval { expression: expression.to_string(), message: message.to_string() }
    }

    pub fn unsupported_clause(text: impl ToString) -> Self {
        FireqlError::UnsupportedClause(text.to_string())
    }

    pub fn err<T>(self) -> Result<T, FireqlError> {
        Err(self)
    }
}

pub type FireqlResult<T> = Result<T, FireqlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_diagnostic_context() {
        let err = FireqlError::UnknownField { field: "address.city".into(), document: "7".into() };
        assert_eq!(err.to_string(), "unknown field \"address.city\" in doc \"7\"");

        let err = FireqlError::Arity { name: "LENGTH".into(), required: 1, got: 0 };
        assert!(err.to_string().contains("\"LENGTH\""));

        let err = FireqlError::UnsupportedOperand { function: "LENGTH".into(), kind: ValueKind::Bool };
        assert_eq!(err.to_string(), "LENGTH of type \"bool\" is not supported");
    }
}
