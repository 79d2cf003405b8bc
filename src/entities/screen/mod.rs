//! Screen entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::ScreenDescriptor;
pub use model::{Action, Permission, SUPER_ADMIN_ROLE, Screen, ScreenView};
