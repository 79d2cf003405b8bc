//! Tenant HTTP handlers

use super::model::{BulkDeleteTenants, CreateTenant, Tenant, UpdateTenant};
use crate::core::error::AdminError;
use crate::core::extract::{JsonBody, QueryParams};
use crate::core::id::RecordId;
use crate::core::query::{ListParams, PaginationMeta};
use crate::core::record::{NameMatch, Record};
use crate::core::response::ApiResponse;
use crate::core::timestamp;
use crate::entities::shared::ensure_unique;
use crate::server::state::AppState;
use axum::extract::{Path, State};
use validator::Validate;

pub async fn list_tenants(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<ApiResponse<Vec<Tenant>>, AdminError> {
    let query = params.to_query("name")?;
    let page = state.tenants.list(&query).await?;

    Ok(ApiResponse::ok("Tenants fetched successfully", page.items)
        .with_pagination(PaginationMeta::from_params(&params, page.total)))
}

pub async fn get_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<ApiResponse<Tenant>, AdminError> {
    let id = RecordId::parse_path(&tenant_id, Tenant::LABEL)?;
    let tenant = state
        .tenants
        .get(&id)
        .await?
        .ok_or(AdminError::not_found(Tenant::LABEL))?;

    Ok(ApiResponse::ok("Tenant fetched successfully", tenant))
}

pub async fn create_tenant(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateTenant>,
) -> Result<ApiResponse<Tenant>, AdminError> {
    let input = input.normalized();
    input.validate()?;

    ensure_unique(state.tenants.as_ref(), "email", &input.email, NameMatch::Exact, None).await?;

    let now = timestamp::now();
    let tenant = state
        .tenants
        .insert(Tenant {
            id: RecordId::generate(),
            name: input.name,
            email: input.email,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(tenant_id = %tenant.id, "tenant created");
    Ok(ApiResponse::created("Tenant added successfully", tenant))
}

pub async fn update_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    JsonBody(input): JsonBody<UpdateTenant>,
) -> Result<ApiResponse<Tenant>, AdminError> {
    let id = RecordId::parse_path(&tenant_id, Tenant::LABEL)?;
    let input = input.normalized();
    input.validate()?;

    let mut tenant = state
        .tenants
        .get(&id)
        .await?
        .ok_or(AdminError::not_found(Tenant::LABEL))?;

    if let Some(email) = input.email {
        ensure_unique(state.tenants.as_ref(), "email", &email, NameMatch::Exact, Some(&id)).await?;
        tenant.email = email;
    }
    if let Some(name) = input.name {
        tenant.name = name;
    }
    if let Some(is_active) = input.is_active {
        tenant.is_active = is_active;
    }
    tenant.updated_at = timestamp::now();

    let tenant = state
        .tenants
        .replace(tenant)
        .await?
        .ok_or(AdminError::not_found(Tenant::LABEL))?;

    tracing::info!(tenant_id = %tenant.id, "tenant updated");
    Ok(ApiResponse::ok("Tenant updated successfully", tenant))
}

pub async fn delete_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> Result<ApiResponse<()>, AdminError> {
    let id = RecordId::parse_path(&tenant_id, Tenant::LABEL)?;
    state
        .tenants
        .delete(&id)
        .await?
        .ok_or(AdminError::not_found(Tenant::LABEL))?;

    tracing::info!(tenant_id = %id, "tenant removed");
    Ok(ApiResponse::message("Tenant removed successfully"))
}

/// Delete the listed tenants. Malformed IDs cannot match a record and are
/// skipped; the response carries the number actually removed.
pub async fn bulk_delete_tenants(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<BulkDeleteTenants>,
) -> Result<ApiResponse<()>, AdminError> {
    if input.tenant_ids.is_empty() {
        return Err(AdminError::validation("No tenant IDs provided for deletion"));
    }

    let ids: Vec<RecordId> = input
        .tenant_ids
        .iter()
        .filter_map(|raw| RecordId::parse(raw.trim()))
        .collect();
    let deleted = state.tenants.delete_many(&ids).await?;

    tracing::info!(requested = input.tenant_ids.len(), deleted, "tenants bulk deleted");
    Ok(ApiResponse::deleted(
        format!("{} tenant(s) deleted successfully", deleted),
        deleted,
    ))
}

pub async fn delete_all_tenants(State(state): State<AppState>) -> Result<ApiResponse<()>, AdminError> {
    let deleted = state.tenants.delete_all().await?;

    tracing::warn!(deleted, "all tenants deleted");
    Ok(ApiResponse::deleted(
        format!("{} tenant(s) deleted successfully", deleted),
        deleted,
    ))
}
