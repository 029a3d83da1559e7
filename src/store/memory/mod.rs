pub mod id_type;
pub use id_type::*;

pub mod id_manager;
pub use id_manager::*;

pub mod store_config;
pub use store_config::*;

pub mod value_order;
pub use value_order::*;

pub mod memory_collection;
pub use memory_collection::*;

pub mod memory_store;
pub use memory_store::*;
