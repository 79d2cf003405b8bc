//! Entity descriptor for ProviderUser
//!
//! Registered under `/provider-users`, so the full paths are
//! `/provider-users/users`, `/provider-users/users/{userId}`, ...

use super::handlers::{
    bulk_delete_users, create_user, delete_all_users, delete_user, get_user, list_users,
    update_user,
};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::state::AppState;
use axum::{
    Router,
    routing::{delete, get},
};

/// Parent path the provider-user routes are nested under
pub const PARENT_PATH: &str = "/provider-users";

/// Descriptor for the ProviderUser entity
pub struct ProviderUserDescriptor;

impl EntityDescriptor for ProviderUserDescriptor {
    fn entity_type(&self) -> &str {
        "provider_user"
    }

    fn base_path(&self) -> &str {
        "/users"
    }

    fn build_routes(&self) -> Router<AppState> {
        Router::new()
            .route("/", get(list_users).post(create_user))
            .route("/bulk", delete(bulk_delete_users))
            .route("/all", delete(delete_all_users))
            .route(
                "/{userId}",
                get(get_user).put(update_user).delete(delete_user),
            )
    }
}
