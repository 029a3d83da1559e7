pub mod scalar_function;
pub use scalar_function::*;

pub mod function_registry;
pub use function_registry::*;

pub mod builtins;
pub use builtins::*;
