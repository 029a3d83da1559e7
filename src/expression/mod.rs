pub mod value_ops;
pub use value_ops::*;

pub mod compiled_expression;
pub use compiled_expression::*;

pub mod evaluator;
pub use evaluator::*;
