//! Entities module - contains all business entities

pub mod module;
pub mod provider;
pub mod provider_user;
pub mod role;
pub mod screen;
pub mod shared;
pub mod tenant;

// Re-export models for convenience
pub use module::Module;
pub use provider::Provider;
pub use provider_user::ProviderUser;
pub use role::Role;
pub use screen::Screen;
pub use tenant::Tenant;

use crate::server::entity_registry::EntityRegistry;

/// Register every entity group with the registry
pub fn register_all(registry: &mut EntityRegistry) {
    registry
        .register(Box::new(role::RoleDescriptor))
        .register(Box::new(module::ModuleDescriptor))
        .register(Box::new(screen::ScreenDescriptor))
        .register(Box::new(provider::ProviderDescriptor))
        .register_under(
            provider_user::descriptor::PARENT_PATH,
            Box::new(provider_user::ProviderUserDescriptor),
        )
        .register(Box::new(tenant::TenantDescriptor));
}
