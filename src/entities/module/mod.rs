//! Module entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::ModuleDescriptor;
pub use model::{Module, ModuleView};
