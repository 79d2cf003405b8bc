//! Provider entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::ProviderDescriptor;
pub use model::{Provider, ProviderSummary};
