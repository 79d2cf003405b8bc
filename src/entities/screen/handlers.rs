//! Screen HTTP handlers

use super::model::{
    CreateScreen, Permission, PermissionView, SUPER_ADMIN_ROLE, Screen,
    ScreenView, UpdateScreen, grant_super_admin, parse_permissions,
};
use crate::core::error::AdminError;
use crate::core::extract::{JsonBody, QueryParams};
use crate::core::id::RecordId;
use crate::core::query::{ListParams, PaginationMeta};
use crate::core::record::{NameMatch, Record};
use crate::core::references::{ensure_exist, lookup_map};
use crate::core::response::ApiResponse;
use crate::core::timestamp;
use crate::entities::role::Role;
use crate::entities::shared::{ensure_unique, required_name};
use crate::server::state::AppState;
use axum::extract::{Path, State};

/// Expand the role of every permission across a batch of screens.
///
/// Permissions whose role no longer exists are left out.
pub async fn expand_screens(state: &AppState, screens: Vec<Screen>) -> Result<Vec<ScreenView>, AdminError> {
    let role_ids: Vec<RecordId> = screens
        .iter()
        .flat_map(|s| s.permissions.iter().map(|p| p.role.clone()))
        .collect();
    let roles = lookup_map(state.roles.as_ref(), &role_ids).await?;

    Ok(screens
        .into_iter()
        .map(|screen| ScreenView {
            permissions: screen
                .permissions
                .into_iter()
                .filter_map(|p| {
                    roles.get(&p.role).map(|role| PermissionView {
                        role: role.clone(),
                        actions: p.actions,
                    })
                })
                .collect(),
            id: screen.id,
            name: screen.name,
            is_active: screen.is_active,
            created_at: screen.created_at,
            updated_at: screen.updated_at,
        })
        .collect())
}

async fn expand_one(state: &AppState, screen: Screen) -> Result<ScreenView, AdminError> {
    expand_screens(state, vec![screen])
        .await?
        .pop()
        .ok_or_else(|| AdminError::Internal("screen expansion returned nothing".to_string()))
}

/// Add the superAdmin grant when that role exists.
async fn apply_super_admin_grant(
    state: &AppState,
    permissions: &mut Vec<Permission>,
) -> Result<(), AdminError> {
    let super_admin = state
        .roles
        .find_one_by("name", SUPER_ADMIN_ROLE, NameMatch::CaseInsensitive, None)
        .await?;
    if let Some(role) = super_admin {
        grant_super_admin(permissions, &role.id);
    }
    Ok(())
}

async fn ensure_roles_exist(state: &AppState, permissions: &[Permission]) -> Result<(), AdminError> {
    let role_ids: Vec<RecordId> = permissions.iter().map(|p| p.role.clone()).collect();
    ensure_exist(state.roles.as_ref(), Role::LABEL, &role_ids).await
}

pub async fn list_screens(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<ApiResponse<Vec<ScreenView>>, AdminError> {
    let query = params.to_query("name")?;
    let page = state.screens.list(&query).await?;
    let screens = expand_screens(&state, page.items).await?;

    Ok(ApiResponse::ok("Screens fetched successfully", screens)
        .with_pagination(PaginationMeta::from_params(&params, page.total)))
}

pub async fn get_screen(
    State(state): State<AppState>,
    Path(screen_id): Path<String>,
) -> Result<ApiResponse<ScreenView>, AdminError> {
    let id = RecordId::parse_path(&screen_id, Screen::LABEL)?;
    let screen = state
        .screens
        .get(&id)
        .await?
        .ok_or(AdminError::not_found(Screen::LABEL))?;

    Ok(ApiResponse::ok(
        "Screen fetched successfully",
        expand_one(&state, screen).await?,
    ))
}

pub async fn create_screen(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateScreen>,
) -> Result<ApiResponse<ScreenView>, AdminError> {
    let name = required_name(input.name.as_deref(), Screen::LABEL)?;
    let mut permissions = parse_permissions(&input.permissions)?;

    ensure_unique(state.screens.as_ref(), "name", &name, NameMatch::Exact, None).await?;
    ensure_roles_exist(&state, &permissions).await?;
    apply_super_admin_grant(&state, &mut permissions).await?;

    let now = timestamp::now();
    let screen = state
        .screens
        .insert(Screen {
            id: RecordId::generate(),
            name,
            permissions,
            is_active: input.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(screen_id = %screen.id, name = %screen.name, "screen created");
    Ok(ApiResponse::created(
        "Screen created successfully",
        expand_one(&state, screen).await?,
    ))
}

pub async fn update_screen(
    State(state): State<AppState>,
    Path(screen_id): Path<String>,
    JsonBody(input): JsonBody<UpdateScreen>,
) -> Result<ApiResponse<ScreenView>, AdminError> {
    let id = RecordId::parse_path(&screen_id, Screen::LABEL)?;
    let permissions = input
        .permissions
        .as_deref()
        .map(parse_permissions)
        .transpose()?;

    let mut screen = state
        .screens
        .get(&id)
        .await?
        .ok_or(AdminError::not_found(Screen::LABEL))?;

    if let Some(raw) = input.name.as_deref() {
        let name = required_name(Some(raw), Screen::LABEL)?;
        ensure_unique(state.screens.as_ref(), "name", &name, NameMatch::Exact, Some(&id)).await?;
        screen.name = name;
    }
    if let Some(is_active) = input.is_active {
        screen.is_active = is_active;
    }

    if let Some(permissions) = permissions {
        ensure_roles_exist(&state, &permissions).await?;
        screen.permissions = permissions;
    }
    apply_super_admin_grant(&state, &mut screen.permissions).await?;
    screen.updated_at = timestamp::now();

    let screen = state
        .screens
        .replace(screen)
        .await?
        .ok_or(AdminError::not_found(Screen::LABEL))?;

    tracing::info!(screen_id = %screen.id, "screen updated");
    Ok(ApiResponse::ok(
        "Screen updated successfully",
        expand_one(&state, screen).await?,
    ))
}

pub async fn delete_screen(
    State(state): State<AppState>,
    Path(screen_id): Path<String>,
) -> Result<ApiResponse<()>, AdminError> {
    let id = RecordId::parse_path(&screen_id, Screen::LABEL)?;
    state
        .screens
        .delete(&id)
        .await?
        .ok_or(AdminError::not_found(Screen::LABEL))?;

    tracing::info!(screen_id = %id, "screen deleted");
    Ok(ApiResponse::message("Screen deleted successfully"))
}

