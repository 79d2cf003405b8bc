//! Tenant entity module

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::TenantDescriptor;
pub use model::Tenant;
