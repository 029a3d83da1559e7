pub mod value_kind;
pub use value_kind::*;

pub mod document;
pub use document::*;

pub mod store_query;
pub use store_query::*;

pub mod document_store;
pub use document_store::*;

pub mod memory;
