use serde::{Deserialize, Serialize};

/// How the memory store names documents that arrive without an id.
///
/// - `Uuid`: generate a random UUID string.
/// - `Int`: generate the next integer after the largest one seen.
/// - `None`: never generate; such documents are rejected.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum IdType {
    #[default]
    Uuid,
    Int,
    None,
}
