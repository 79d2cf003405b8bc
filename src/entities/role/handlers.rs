//! Role HTTP handlers

use super::model::{CreateRole, Role, RoleView, UpdateRole};
use crate::core::error::AdminError;
use crate::core::extract::{JsonBody, QueryParams};
use crate::core::id::RecordId;
use crate::core::query::{ListParams, PaginationMeta};
use crate::core::record::{NameMatch, Record};
use crate::core::references::{ensure_exist, lookup_map, parse_references, pick_ordered};
use crate::core::response::ApiResponse;
use crate::core::timestamp;
use crate::entities::module::Module;
use crate::entities::module::handlers::expand_modules;
use crate::entities::shared::{ensure_unique, required_name};
use crate::server::state::AppState;
use axum::extract::{Path, State};
use std::collections::HashMap;

/// Expand roles to modules to screens, one lookup per level for the batch.
pub async fn expand_roles(state: &AppState, roles: Vec<Role>) -> Result<Vec<RoleView>, AdminError> {
    let modules = lookup_map(state.modules.as_ref(), roles.iter().flat_map(|r| r.modules.iter())).await?;
    let expanded: HashMap<RecordId, _> = expand_modules(state, modules.into_values().collect())
        .await?
        .into_iter()
        .map(|view| (view.id.clone(), view))
        .collect();

    Ok(roles
        .into_iter()
        .map(|role| RoleView {
            modules: pick_ordered(&expanded, &role.modules),
            id: role.id,
            name: role.name,
            is_active: role.is_active,
            created_at: role.created_at,
            updated_at: role.updated_at,
        })
        .collect())
}

async fn expand_one(state: &AppState, role: Role) -> Result<RoleView, AdminError> {
    expand_roles(state, vec![role])
        .await?
        .pop()
        .ok_or_else(|| AdminError::Internal("role expansion returned nothing".to_string()))
}

pub async fn list_roles(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<ApiResponse<Vec<RoleView>>, AdminError> {
    let query = params.to_query("name")?;
    let page = state.roles.list(&query).await?;
    let roles = expand_roles(&state, page.items).await?;

    Ok(ApiResponse::ok("Roles fetched successfully", roles)
        .with_pagination(PaginationMeta::from_params(&params, page.total)))
}

pub async fn get_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> Result<ApiResponse<RoleView>, AdminError> {
    let id = RecordId::parse_path(&role_id, Role::LABEL)?;
    let role = state
        .roles
        .get(&id)
        .await?
        .ok_or(AdminError::not_found(Role::LABEL))?;

    Ok(ApiResponse::ok(
        "Role fetched successfully",
        expand_one(&state, role).await?,
    ))
}

pub async fn create_role(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateRole>,
) -> Result<ApiResponse<RoleView>, AdminError> {
    let name = required_name(input.name.as_deref(), Role::LABEL)?;
    let modules = parse_references(Module::LABEL, &input.modules)?;

    ensure_unique(state.roles.as_ref(), "name", &name, NameMatch::CaseInsensitive, None).await?;
    ensure_exist(state.modules.as_ref(), Module::LABEL, &modules).await?;

    let now = timestamp::now();
    let role = state
        .roles
        .insert(Role {
            id: RecordId::generate(),
            name,
            modules,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(role_id = %role.id, name = %role.name, "role created");
    Ok(ApiResponse::created(
        "Role created successfully",
        expand_one(&state, role).await?,
    ))
}

pub async fn update_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    JsonBody(input): JsonBody<UpdateRole>,
) -> Result<ApiResponse<RoleView>, AdminError> {
    let id = RecordId::parse_path(&role_id, Role::LABEL)?;
    let modules = input
        .modules
        .as_deref()
        .map(|raw| parse_references(Module::LABEL, raw))
        .transpose()?;

    let mut role = state
        .roles
        .get(&id)
        .await?
        .ok_or(AdminError::not_found(Role::LABEL))?;

    if let Some(raw) = input.name.as_deref() {
        let name = required_name(Some(raw), Role::LABEL)?;
        ensure_unique(
            state.roles.as_ref(),
            "name",
            &name,
            NameMatch::CaseInsensitive,
            Some(&id),
        )
        .await?;
        role.name = name;
    }
    if let Some(modules) = modules {
        ensure_exist(state.modules.as_ref(), Module::LABEL, &modules).await?;
        role.modules = modules;
    }
    if let Some(is_active) = input.is_active {
        role.is_active = is_active;
    }
    role.updated_at = timestamp::now();

    let role = state
        .roles
        .replace(role)
        .await?
        .ok_or(AdminError::not_found(Role::LABEL))?;

    tracing::info!(role_id = %role.id, "role updated");
    Ok(ApiResponse::ok(
        "Role updated successfully",
        expand_one(&state, role).await?,
    ))
}

pub async fn delete_role(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> Result<ApiResponse<()>, AdminError> {
    let id = RecordId::parse_path(&role_id, Role::LABEL)?;
    state
        .roles
        .delete(&id)
        .await?
        .ok_or(AdminError::not_found(Role::LABEL))?;

    tracing::info!(role_id = %id, "role deleted");
    Ok(ApiResponse::message("Role deleted successfully"))
}
