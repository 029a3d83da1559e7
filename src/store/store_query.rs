use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which documents a query targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionRef {
    /// A single named collection (`users`, `users/1/orders`).
    Collection(String),
    /// Every collection sharing this name, at any nesting depth.
    Group(String),
}

impl CollectionRef {
    pub fn name(&self) -> &str {
        match self {
            CollectionRef::Collection(name) | CollectionRef::Group(name) => name,
        }
    }
}

/// Store-native comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    In,
    NotIn,
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            FilterOp::Equal => "==",
            FilterOp::NotEqual => "!=",
            FilterOp::LessThan => "<",
            FilterOp::LessThanOrEqual => "<=",
            FilterOp::GreaterThan => ">",
            FilterOp::GreaterThanOrEqual => ">=",
            FilterOp::In => "in",
            FilterOp::NotIn => "not-in",
        };
        f.write_str(op)
    }
}

/// One `field op value` filter directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: Value) -> Self {
        Self { field: field.into(), op, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// The query handle handed to a [`DocumentStore`](crate::store::DocumentStore).
///
/// Built once per query by the clause compiler. An empty `select` list means
/// whole documents are requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreQuery {
    pub target: CollectionRef,
    pub select: Vec<String>,
    pub filters: Vec<Filter>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<usize>,
}

impl StoreQuery {
    pub fn new(target: CollectionRef) -> Self {
        Self { target, select: Vec::new(), filters: Vec::new(), order_by: Vec::new(), limit: None }
    }

    pub fn collection(name: impl Into<String>) -> Self {
        Self::new(CollectionRef::Collection(name.into()))
    }

    pub fn collection_group(name: impl Into<String>) -> Self {
        Self::new(CollectionRef::Group(name.into()))
    }

    pub fn select<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, value: Value) -> Self {
        self.filters.push(Filter::new(field, op, value));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push(OrderBy { field: field.into(), direction });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builder_accumulates_directives_in_order() {
        let q = StoreQuery::collection("users")
            .select(["id", "address.city"])
            .filter("id", FilterOp::GreaterThan, json!(3))
            .filter("name", FilterOp::Equal, json!("Eleanora"))
            .order_by("id", Direction::Desc)
            .order_by("name", Direction::Asc)
            .limit(5);

        assert_eq!(q.target, CollectionRef::Collection("users".into()));
        assert_eq!(q.select, vec!["id", "address.city"]);
        assert_eq!(q.filters.len(), 2);
        assert_eq!(q.filters[1].field, "name");
        assert_eq!(q.order_by[0], OrderBy { field: "id".into(), direction: Direction::Desc });
        assert_eq!(q.limit, Some(5));
    }

    #[test]
    fn operators_use_store_spelling() {
        assert_eq!(FilterOp::Equal.to_string(), "==");
        assert_eq!(FilterOp::NotIn.to_string(), "not-in");
        assert_eq!(FilterOp::GreaterThanOrEqual.to_string(), ">=");
    }
}
