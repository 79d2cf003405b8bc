//! ProviderUser entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::ProviderUserDescriptor;
pub use model::{ProviderUser, ProviderUserView};
