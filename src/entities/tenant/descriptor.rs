//! Entity descriptor for Tenant

use super::handlers::{
    bulk_delete_tenants, create_tenant, delete_all_tenants, delete_tenant, get_tenant,
    list_tenants, update_tenant,
};
use crate::server::entity_registry::EntityDescriptor;
use crate::server::state::AppState;
use axum::{
    Router,
    routing::{delete, get},
};

/// Descriptor for the Tenant entity
pub struct TenantDescriptor;

impl EntityDescriptor for TenantDescriptor {
    fn entity_type(&self) -> &str {
        "tenant"
    }

    fn base_path(&self) -> &str {
        "/tenants"
    }

    fn build_routes(&self) -> Router<AppState> {
        Router::new()
            .route(
                "/",
                get(list_tenants)
                    .post(create_tenant)
                    .delete(delete_all_tenants),
            )
            .route("/bulk", delete(bulk_delete_tenants))
            .route(
                "/{tenantId}",
                get(get_tenant).put(update_tenant).delete(delete_tenant),
            )
    }
}
