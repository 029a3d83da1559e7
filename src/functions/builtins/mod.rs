pub mod length_impl;
pub use length_impl::*;

pub mod case_impl;
pub use case_impl::*;

pub mod trim_impl;
pub use trim_impl::*;
