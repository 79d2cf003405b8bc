//! Entity descriptor for Provider

use super::handlers::{create_provider, get_provider, update_provider};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Descriptor for the Provider entity
///
/// Providers are never deleted through the API.
pub struct ProviderDescriptor;

impl EntityDescriptor for ProviderDescriptor {
    fn entity_type(&self) -> &str {
        "provider"
    }

    fn base_path(&self) -> &str {
        "/providers"
    }

    fn build_routes(&self) -> Router<AppState> {
        Router::new()
            .route("/", post(create_provider))
            .route("/getProvider", get(get_provider))
            .route("/{providerId}", put(update_provider))
    }
}
