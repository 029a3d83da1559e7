use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{expression::CompiledExpression, store::DOCUMENT_ID};

/// Marker written in place of a wildcard column.
pub const STAR: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Field,
    Function,
    Expr,
    Star,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Field => "FIELD",
            ColumnKind::Function => "FUNCTION",
            ColumnKind::Expr => "EXPR",
            ColumnKind::Star => "STAR",
        };
        f.write_str(name)
    }
}

/// One planned output column.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectColumn {
    /// Dotted path into document data, or `__name__` for the document id.
    Field { path: String, alias: String },
    /// Registry function applied to planned arguments.
    Function { name: String, alias: String, args: Vec<SelectColumn> },
    /// Computed expression; `vars` holds one field column per free variable.
    Expr { expression: CompiledExpression, alias: String, vars: Vec<SelectColumn> },
    /// Wildcard, replaced by the first document's keys at projection time.
    Star,
}

impl SelectColumn {
    pub fn new_field(path: impl Into<String>, alias: Option<String>) -> Self {
        let path = path.into();
        let alias = alias.unwrap_or_else(|| path.clone());
        SelectColumn::Field { path, alias }
    }

    /// Path, function name, expression source or the wildcard marker.
    pub fn field(&self) -> &str {
        match self {
            SelectColumn::Field { path, .. } => path,
            SelectColumn::Function { name, .. } => name,
            SelectColumn::Expr { expression, .. } => expression.source(),
            SelectColumn::Star => STAR,
        }
    }

    /// Output name. Unset for a wildcard.
    pub fn alias(&self) -> Option<&str> {
        match self {
            SelectColumn::Field { alias, .. }
            | SelectColumn::Function { alias, .. }
            | SelectColumn::Expr { alias, .. } => Some(alias),
            SelectColumn::Star => None,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            SelectColumn::Field { .. } => ColumnKind::Field,
            SelectColumn::Function { .. } => ColumnKind::Function,
            SelectColumn::Expr { .. } => ColumnKind::Expr,
            SelectColumn::Star => ColumnKind::Star,
        }
    }

    pub fn params(&self) -> &[SelectColumn] {
        match self {
            SelectColumn::Function { args, .. } => args,
            SelectColumn::Expr { vars, .. } => vars,
            SelectColumn::Field { .. } | SelectColumn::Star => &[],
        }
    }

    pub fn is_star(&self) -> bool {
        matches!(self, SelectColumn::Star)
    }

    /// Append the document paths this column reads to `out`, skipping ones
    /// already present and the document id.
    pub fn collect_fields(&self, out: &mut Vec<String>) {
        match self {
            SelectColumn::Field { path, .. } => {
                if path != DOCUMENT_ID && !out.contains(path) {
                    out.push(path.clone());
                }
            }
            SelectColumn::Star => {}
            _ => self.params().iter().for_each(|p| p.collect_fields(out)),
        }
    }
}
