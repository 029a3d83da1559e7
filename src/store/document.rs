use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved field path that refers to the document identifier instead of a
/// key in the document data.
pub const DOCUMENT_ID: &str = "__name__";

/// One record returned by a store: its identifier and its nested data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self { id: id.into(), data }
    }

    /// Build a document from a JSON value. Non-object values produce a
    /// document with empty data.
    pub fn from_value(id: impl Into<String>, value: Value) -> Self {
        let data = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, data)
    }

    /// Resolve a dotted field path against the document.
    ///
    /// `__name__` yields the document id. The walk stops at the first `null`
    /// it meets and yields `null`; a missing key or a non-map intermediate
    /// yields `None`.
    pub fn lookup(&self, path: &str) -> Option<Value> {
        if path == DOCUMENT_ID {
            return Some(Value::String(self.id.clone()));
        }
        lookup_path(&self.data, path).cloned()
    }

    /// Top-level keys of the document data, in stored order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }
}

/// Walk `path` segment by segment through nested maps.
pub fn lookup_path<'a>(data: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = data.get(first)?;
    for segment in segments {
        current = match current {
            Value::Null => return Some(current),
            Value::Object(map) => map.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}
