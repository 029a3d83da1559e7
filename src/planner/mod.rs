pub mod select_column;
pub use select_column::*;

pub mod column_plan;
pub use column_plan::*;

pub mod column_plan_builder;
pub use column_plan_builder::*;
