use serde::{Deserialize, Serialize};

use crate::store::memory::IdType;

/// How the memory store keys the documents of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStoreConfig {
    /// Data key read as the document id when a document carries it.
    pub id_key: String,
    /// Id generation for documents without `id_key`.
    pub id_type: IdType,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self::keyed_by("id", IdType::Uuid)
    }
}

impl MemoryStoreConfig {
    pub fn keyed_by(id_key: impl Into<String>, id_type: IdType) -> Self {
        Self { id_key: id_key.into(), id_type }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: MemoryStoreConfig = serde_json::from_str(r#"{ "id_type": "Int" }"#).unwrap();
        assert_eq!(config, MemoryStoreConfig::keyed_by("id", IdType::Int));
        assert_eq!(MemoryStoreConfig::default().id_type, IdType::Uuid);
    }
}
