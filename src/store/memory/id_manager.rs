use uuid::Uuid;

use crate::store::memory::IdType;

/// Hands out document ids for one collection.
///
/// Integer ids continue after the largest integer id the collection has
/// seen, whether generated or supplied by a document.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IdManager {
    id_type: IdType,
    last_int: u64,
}

impl IdManager {
    pub fn new(id_type: IdType) -> Self {
        Self { id_type, last_int: 0 }
    }

    /// Record an externally supplied id.
    pub fn observe(&mut self, id: &str) {
        if self.id_type != IdType::Int {
            return;
        }
        if let Ok(seen) = id.parse::<u64>() {
            self.last_int = self.last_int.max(seen);
        }
    }

    /// Next free id, or `None` when the collection never generates ids.
    pub fn generate(&mut self) -> Option<String> {
        match self.id_type {
            IdType::None => None,
            IdType::Int => {
                self.last_int = self.last_int.checked_add(1)?;
                Some(self.last_int.to_string())
            }
            IdType::Uuid => Some(Uuid::new_v4().to_string()),
        }
    }
}
