use crate::planner::SelectColumn;

/// Planned column list plus the field paths the store has to return.
///
/// `fields` is empty when a wildcard is present, so whole documents come
/// back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnPlan {
    pub columns: Vec<SelectColumn>,
    pub fields: Vec<String>,
}

impl ColumnPlan {
    pub fn new(columns: Vec<SelectColumn>) -> Self {
        let fields = if columns.iter().any(SelectColumn::is_star) {
            Vec::new()
        } else {
            let mut fields = Vec::new();
            columns.iter().for_each(|c| c.collect_fields(&mut fields));
            fields
        };
        Self { columns, fields }
    }

    pub fn has_star(&self) -> bool {
        self.columns.iter().any(SelectColumn::is_star)
    }

    /// Column names before wildcard expansion.
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().filter_map(|c| c.alias().map(str::to_string)).collect()
    }
}
