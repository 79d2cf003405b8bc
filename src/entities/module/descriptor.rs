//! Entity descriptor for Module

use super::handlers::{create_module, delete_module, get_module, list_modules, update_module};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::state::AppState;
use axum::{Router, routing::get};

/// Descriptor for the Module entity
pub struct ModuleDescriptor;

impl EntityDescriptor for ModuleDescriptor {
    fn entity_type(&self) -> &str {
        "module"
    }

    fn base_path(&self) -> &str {
        "/modules"
    }

    fn build_routes(&self) -> Router<AppState> {
        Router::new()
            .route("/", get(list_modules).post(create_module))
            .route(
                "/{moduleId}",
                get(get_module).put(update_module).delete(delete_module),
            )
    }
}
