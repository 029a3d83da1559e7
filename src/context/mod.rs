pub mod credentials;
pub use credentials::*;

pub mod query_context;
pub use query_context::*;
