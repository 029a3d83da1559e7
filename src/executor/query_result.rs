use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column names plus one row of values per returned document, aligned by
/// position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub records: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, records: Vec<Vec<Value>>) -> Self {
        Self { columns, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows as JSON objects keyed by column name, in column order.
    pub fn to_objects(&self) -> Vec<Map<String, Value>> {
        self.records
            .iter()
            .map(|row| self.columns.iter().cloned().zip(row.iter().cloned()).collect())
            .collect()
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.records.iter().filter_map(|row| row.get(idx)).collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn objects_follow_column_order() {
        let result = QueryResult::new(
            vec!["id".into(), "city".into()],
            vec![vec![json!(1), json!("Gwenborough")], vec![json!(2), json!("Wisokyburgh")]],
        );
        assert_eq!(result.len(), 2);
        let objects = result.to_objects();
        assert_eq!(Value::Object(objects[1].clone()), json!({ "id": 2, "city": "Wisokyburgh" }));
        assert_eq!(objects[0].keys().collect::<Vec<_>>(), vec!["id", "city"]);
        assert_eq!(result.column("city").unwrap(), vec![&json!("Gwenborough"), &json!("Wisokyburgh")]);
        assert!(result.column("zip").is_none());
    }

    #[test]
    fn serializes_as_columns_and_records() {
        let result = QueryResult::new(vec!["a".into()], vec![]);
        assert!(result.is_empty());
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({ "columns": ["a"], "records": [] }));
    }
}
