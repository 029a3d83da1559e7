use std::{fs, path::Path};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::warn;

use crate::{
    error::{FireqlError, FireqlResult},
    store::{
        lookup_path, memory::{IdManager, MemoryStoreConfig, ValueOrder},
        Direction, Document, StoreQuery,
    },
};

/// One named collection held in memory.
///
/// Documents keep insertion order, which is the order queries return them in
/// unless an ORDER BY directive says otherwise.
pub struct MemoryCollection {
    documents: IndexMap<String, Map<String, Value>>,
    id_manager: IdManager,
    config: MemoryStoreConfig,
    /// full collection path, e.g. `users` or `users/1/orders`
    pub path: String,
}

impl MemoryCollection {
    pub fn new(path: &str, config: MemoryStoreConfig) -> Self {
        Self {
            documents: IndexMap::new(),
            id_manager: IdManager::new(config.id_type),
            config,
            path: path.to_string(),
        }
    }

    /// Last segment of the collection path, used for collection-group lookups.
    pub fn group_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        self.documents.get(id).map(|data| Document::new(id, data.clone()))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    /// Store `data` under an explicit id, replacing any previous document.
    pub fn set(&mut self, id: &str, data: Map<String, Value>) -> Document {
        self.id_manager.observe(id);
        self.documents.insert(id.to_string(), data.clone());
        Document::new(id, data)
    }

    /// Add a document, reading its id from the configured id key or
    /// generating one.
    pub fn add(&mut self, item: Value) -> FireqlResult<Document> {
        let Value::Object(data) = item else {
            return FireqlError::Store(format!("collection {} only accepts JSON objects", self.path)).err();
        };

        let id = match data.get(&self.config.id_key) {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };
        let id = match id {
            Some(id) => id,
            None => match self.id_manager.generate() {
                Some(generated) => generated,
                None => {
                    return FireqlError::Store(format!(
                        "document without \"{}\" cannot be added to {}",
                        self.config.id_key, self.path
                    ))
                    .err();
                }
            },
        };

        Ok(self.set(&id, data))
    }

    /// Add every object of a JSON array. Items that cannot be added are
    /// skipped with a warning.
    pub fn add_batch(&mut self, items: Value) -> Vec<Document> {
        let Value::Array(items) = items else {
            return Vec::new();
        };

        let mut added = Vec::with_capacity(items.len());
        for item in items {
            match self.add(item) {
                Ok(document) => added.push(document),
                Err(err) => warn!(target: "fireql::store", "skipping document: {err}"),
            }
        }
        added
    }

    pub fn delete(&mut self, id: &str) -> Option<Document> {
        self.documents.shift_remove(id).map(|data| Document::new(id, data))
    }

    pub fn clear(&mut self) -> usize {
        let count = self.documents.len();
        self.documents.clear();
        count
    }

    /// Load a JSON array of documents. Unless `keep` is set, existing
    /// documents are removed first.
    pub fn load_from_json(&mut self, json_value: Value, keep: bool) -> FireqlResult<Vec<Document>> {
        if !json_value.is_array() {
            return FireqlError::Store(format!(
                "JSON loaded into {} does not contain an array at the root",
                self.path
            ))
            .err();
        }

        if !keep {
            self.clear();
        }
        Ok(self.add_batch(json_value))
    }

    pub fn load_from_file(&mut self, file_path: &Path) -> FireqlResult<Vec<Document>> {
        let content = fs::read_to_string(file_path)?;
        let json_value = serde_json::from_str::<Value>(&content)?;
        self.load_from_json(json_value, false)
    }

    /// Evaluate filters, ordering, limit and field selection natively.
    pub fn run(&self, query: &StoreQuery) -> Vec<Document> {
        Self::finish(self.matching(query), query)
    }

    /// Documents satisfying every filter of `query`, in insertion order.
    /// A document missing a filtered field never matches.
    pub fn matching(&self, query: &StoreQuery) -> Vec<Document> {
        self.documents
            .iter()
            .map(|(id, data)| Document::new(id.clone(), data.clone()))
            .filter(|doc| {
                query.filters.iter().all(|filter| {
                    doc.lookup(&filter.field)
                        .map(|value| ValueOrder::matches(&value, filter.op, &filter.value))
                        .unwrap_or(false)
                })
            })
            .collect()
    }

    /// Apply ordering, limit and selection to an already filtered set.
    pub fn finish(mut documents: Vec<Document>, query: &StoreQuery) -> Vec<Document> {
        if !query.order_by.is_empty() {
            // documents missing an ordering field are not part of an ordered result
            documents.retain(|doc| query.order_by.iter().all(|o| doc.lookup(&o.field).is_some()));
            documents.sort_by(|a, b| {
                for key in &query.order_by {
                    let (Some(av), Some(bv)) = (a.lookup(&key.field), b.lookup(&key.field)) else {
                        continue;
                    };
                    let ord = ValueOrder::compare(&av, &bv);
                    let ord = if key.direction == Direction::Desc { ord.reverse() } else { ord };
                    if !ord.is_eq() {
                        return ord;
                    }
                }
                std::cmp::Ordering::Equal
            });
        }

        if let Some(limit) = query.limit {
            documents.truncate(limit);
        }

        if !query.select.is_empty() {
            for doc in documents.iter_mut() {
                doc.data = Self::select_paths(&doc.data, &query.select);
            }
        }
        documents
    }

    /// Copy only the requested paths, keeping their nesting.
    fn select_paths(data: &Map<String, Value>, paths: &[String]) -> Map<String, Value> {
        let mut out = Map::new();
        for path in paths {
            let Some(value) = lookup_path(data, path) else {
                continue;
            };
            let segments: Vec<&str> = path.split('.').collect();
            Self::insert_path(&mut out, &segments, value.clone());
        }
        out
    }

    fn insert_path(target: &mut Map<String, Value>, segments: &[&str], value: Value) {
        match segments {
            [] => {}
            [last] => {
                target.insert(last.to_string(), value);
            }
            [head, rest @ ..] => {
                let entry = target.entry(head.to_string()).or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(map) = &mut *entry {
                    Self::insert_path(map, rest, value);
                } else {
                    let mut map = Map::new();
                    Self::insert_path(&mut map, rest, value);
                    *entry = Value::Object(map);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::{memory::IdType, FilterOp};

    fn people() -> MemoryCollection {
        let mut coll = MemoryCollection::new("people", MemoryStoreConfig::keyed_by("id", IdType::Int));
        coll.add_batch(json!([
            { "id": 1, "name": "Alice", "age": 29, "city": { "name": "Porto" } },
            { "id": 2, "name": "Bruno", "age": 34, "city": { "name": "Lisboa" } },
            { "id": 3, "name": "Carla", "age": 41, "city": { "name": "Braga" } },
            { "id": 4, "name": "David", "city": { "name": "Porto" } }
        ]));
        coll
    }

    #[test]
    fn ids_come_from_the_id_key_or_are_generated() {
        let mut coll = people();
        assert!(coll.exists("3"));
        let added = coll.add(json!({ "name": "Eva" })).unwrap();
        assert_eq!(added.id, "5");
        assert!(!added.data.contains_key("id"));
    }

    #[test]
    fn none_id_type_rejects_documents_without_id() {
        let mut coll = MemoryCollection::new("t", MemoryStoreConfig::keyed_by("key", IdType::None));
        assert!(coll.add(json!({ "x": 1 })).is_err());
        assert_eq!(coll.add(json!({ "key": "k1" })).unwrap().id, "k1");
        assert!(coll.add(json!([1, 2])).is_err());
    }

    #[test]
    fn filters_on_nested_paths() {
        let coll = people();
        let q = StoreQuery::collection("people").filter("city.name", FilterOp::Equal, json!("Porto"));
        let ids: Vec<_> = coll.run(&q).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn ordering_skips_documents_without_the_field() {
        let coll = people();
        let q = StoreQuery::collection("people").order_by("age", Direction::Desc);
        let ids: Vec<_> = coll.run(&q).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn limit_and_select_shape_the_output() {
        let coll = people();
        let q = StoreQuery::collection("people").select(["name", "city.name"]).limit(2);
        let docs = coll.run(&q);
        assert_eq!(docs.len(), 2);
        assert_eq!(Value::Object(docs[0].data.clone()), json!({ "name": "Alice", "city": { "name": "Porto" } }));
    }

    #[test]
    fn document_id_can_be_filtered_and_ordered() {
        let coll = people();
        let q = StoreQuery::collection("people")
            .filter("__name__", FilterOp::In, json!(["2", "3"]))
            .order_by("__name__", Direction::Desc);
        let ids: Vec<_> = coll.run(&q).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["3", "2"]);
    }

    #[test]
    fn select_merges_sibling_paths() {
        let coll = people();
        let q = StoreQuery::collection("people")
            .filter("id", FilterOp::Equal, json!(1))
            .select(["city.name", "name", "city.zip"]);
        let docs = coll.run(&q);
        assert_eq!(Value::Object(docs[0].data.clone()), json!({ "city": { "name": "Porto" }, "name": "Alice" }));
    }

    #[test]
    fn deleted_documents_leave_the_results() {
        let mut coll = people();
        assert_eq!(coll.delete("2").map(|d| d.id), Some("2".to_string()));
        assert!(coll.delete("2").is_none());
        let ids: Vec<_> = coll.run(&StoreQuery::collection("people")).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["1", "3", "4"]);
    }

    #[test]
    fn load_from_json_requires_an_array() {
        let mut coll = people();
        assert!(coll.load_from_json(json!({ "id": 1 }), false).is_err());
        let added = coll.load_from_json(json!([{ "id": 9 }]), false).unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(coll.count(), 1);
    }

    #[test]
    fn load_from_file_reads_a_json_array() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "a", "v": 1}}, {{"id": "b", "v": 2}}]"#).unwrap();

        let mut coll = MemoryCollection::new("t", MemoryStoreConfig::keyed_by("id", IdType::None));
        let added = coll.load_from_file(file.path()).unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(coll.get("b").unwrap().data["v"], json!(2));
    }

    #[test]
    fn group_name_is_last_path_segment() {
        let coll = MemoryCollection::new("users/1/orders", MemoryStoreConfig::default());
        assert_eq!(coll.group_name(), "orders");
    }
}
