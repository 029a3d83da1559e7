use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    error::{FireqlError, FireqlResult},
    store::{
        memory::{MemoryCollection, MemoryStoreConfig},
        CollectionRef, DocumentStore, DocumentStream, StoreQuery, StoreSession,
    },
};

pub type SharedCollection = Arc<RwLock<MemoryCollection>>;

/// In-process document store.
///
/// Collections are addressed by their full path (`users`,
/// `users/1/orders`). A collection-group query reads every collection whose
/// last path segment equals the group name.
#[derive(Default)]
pub struct MemoryStore {
    config: MemoryStoreConfig,
    collections: RwLock<IndexMap<String, SharedCollection>>,
}

fn read_lock<T>(lock: &RwLock<T>) -> FireqlResult<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| FireqlError::Store("memory store lock poisoned".into()))
}

fn write_lock<T>(lock: &RwLock<T>) -> FireqlResult<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| FireqlError::Store("memory store lock poisoned".into()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MemoryStoreConfig) -> Self {
        Self { config, collections: RwLock::new(IndexMap::new()) }
    }

    /// Create (or replace) a collection using the store configuration.
    pub fn create(&self, path: &str) -> FireqlResult<SharedCollection> {
        self.create_with_config(path, self.config.clone())
    }

    pub fn create_with_config(&self, path: &str, config: MemoryStoreConfig) -> FireqlResult<SharedCollection> {
        let collection = Arc::new(RwLock::new(MemoryCollection::new(path, config)));
        write_lock(&self.collections)?.insert(path.to_string(), Arc::clone(&collection));
        debug!(target: "fireql::store", collection = path, "created collection");
        Ok(collection)
    }

    pub fn collection(&self, path: &str) -> Option<SharedCollection> {
        read_lock(&self.collections).ok()?.get(path).map(Arc::clone)
    }

    pub fn list_collections(&self) -> Vec<String> {
        read_lock(&self.collections).map(|c| c.keys().cloned().collect()).unwrap_or_default()
    }

    fn targets(&self, target: &CollectionRef) -> FireqlResult<Vec<SharedCollection>> {
        let collections = read_lock(&self.collections)?;
        let found = match target {
            CollectionRef::Collection(path) => collections.get(path).map(Arc::clone).into_iter().collect(),
            CollectionRef::Group(name) => {
                let mut found = Vec::new();
                for collection in collections.values() {
                    if read_lock(collection)?.group_name() == name {
                        found.push(Arc::clone(collection));
                    }
                }
                found
            }
        };
        Ok(found)
    }
}

impl DocumentStore for MemoryStore {
    fn documents(&self, session: &StoreSession, query: &StoreQuery) -> FireqlResult<DocumentStream<'_>> {
        let targets = self.targets(&query.target)?;
        debug!(
            target: "fireql::store",
            project = %session.project_id,
            collection = query.target.name(),
            collections = targets.len(),
            filters = query.filters.len(),
            "running memory query"
        );

        let documents = match targets.as_slice() {
            [single] => read_lock(single)?.run(query),
            _ => {
                let mut matching = Vec::new();
                for collection in &targets {
                    matching.extend(read_lock(collection)?.matching(query));
                }
                MemoryCollection::finish(matching, query)
            }
        };

        Ok(Box::new(documents.into_iter().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::{memory::IdType, Direction, FilterOp};

    fn session() -> StoreSession {
        StoreSession::new("demo", None)
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::with_config(MemoryStoreConfig::keyed_by("id", IdType::Int));
        store.create("users").unwrap().write().unwrap().add_batch(json!([
            { "id": 1, "name": "Alice" },
            { "id": 2, "name": "Bruno" }
        ]));
        store.create("users/1/orders").unwrap().write().unwrap().add_batch(json!([
            { "id": 10, "total": 30 },
            { "id": 11, "total": 12 }
        ]));
        store.create("users/2/orders").unwrap().write().unwrap().add_batch(json!([
            { "id": 20, "total": 18 }
        ]));
        store
    }

    #[test]
    fn lists_created_collections_in_order() {
        let store = seeded();
        assert_eq!(store.list_collections(), vec!["users", "users/1/orders", "users/2/orders"]);
        assert!(store.collection("users").is_some());
        assert!(store.collection("orders").is_none());
    }

    #[test]
    fn missing_collection_yields_an_empty_stream() {
        let store = seeded();
        let mut stream = store.documents(&session(), &StoreQuery::collection("nope")).unwrap();
        assert!(stream.next().is_none());
    }

    #[test]
    fn collection_group_spans_nested_collections() {
        let store = seeded();
        let q = StoreQuery::collection_group("orders")
            .filter("total", FilterOp::GreaterThan, json!(15))
            .order_by("total", Direction::Asc);
        let ids: Vec<_> = store
            .documents(&session(), &q)
            .unwrap()
            .map(|d| d.unwrap().id)
            .collect();
        assert_eq!(ids, vec!["20", "10"]);
    }

    #[test]
    fn plain_collection_does_not_include_groups() {
        let store = seeded();
        let count = store.documents(&session(), &StoreQuery::collection("orders")).unwrap().count();
        assert_eq!(count, 0);
    }
}
