//! Role entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::RoleDescriptor;
pub use model::{Role, RoleView};
