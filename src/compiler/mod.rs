pub mod literal_converter;
pub use literal_converter::*;

pub mod clause_compiler;
pub use clause_compiler::*;
