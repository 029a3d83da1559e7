pub mod query_result;
pub use query_result::*;

pub mod result_projector;
pub use result_projector::*;

pub mod select_statement;
pub use select_statement::*;
