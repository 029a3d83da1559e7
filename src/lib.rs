pub mod error;
pub use error::{FireqlError, FireqlResult};

pub mod context;
pub use context::{Context, Credentials};

pub mod store;
pub use store::{memory::{IdType, MemoryStore, MemoryStoreConfig}, Document, DocumentStore, StoreQuery};

pub mod functions;
pub use functions::{FunctionRegistry, ScalarFunction};

pub mod expression;
pub mod planner;
pub mod compiler;

pub mod executor;
pub use executor::QueryResult;

pub mod fireql;
pub use fireql::FireQL;
