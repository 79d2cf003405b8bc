//! Entity descriptor for Role

use super::handlers::{create_role, delete_role, get_role, list_roles, update_role};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::state::AppState;
use axum::{Router, routing::get};

/// Descriptor for the Role entity
pub struct RoleDescriptor;

impl EntityDescriptor for RoleDescriptor {
    fn entity_type(&self) -> &str {
        "role"
    }

    fn base_path(&self) -> &str {
        "/roles"
    }

    fn build_routes(&self) -> Router<AppState> {
        Router::new()
            .route("/", get(list_roles).post(create_role))
            .route(
                "/{roleId}",
                get(get_role).put(update_role).delete(delete_role),
            )
    }
}
