//! Module HTTP handlers

use super::model::{CreateModule, Module, ModuleView, UpdateModule};
use crate::core::error::AdminError;
use crate::core::extract::{JsonBody, QueryParams};
use crate::core::id::RecordId;
use crate::core::query::{ListParams, PaginationMeta};
use crate::core::record::{NameMatch, Record};
use crate::core::references::{ensure_exist, lookup_map, parse_references, pick_ordered};
use crate::core::response::ApiResponse;
use crate::core::timestamp;
use crate::entities::screen::Screen;
use crate::entities::shared::{ensure_unique, required_name};
use crate::server::state::AppState;
use axum::extract::{Path, State};

/// Expand the screens of a batch of modules with a single lookup.
pub async fn expand_modules(state: &AppState, modules: Vec<Module>) -> Result<Vec<ModuleView>, AdminError> {
    let screens = lookup_map(
        state.screens.as_ref(),
        modules.iter().flat_map(|m| m.screens.iter()),
    )
    .await?;

    Ok(modules
        .into_iter()
        .map(|module| ModuleView {
            screens: pick_ordered(&screens, &module.screens),
            id: module.id,
            name: module.name,
            created_at: module.created_at,
            updated_at: module.updated_at,
        })
        .collect())
}

async fn expand_one(state: &AppState, module: Module) -> Result<ModuleView, AdminError> {
    expand_modules(state, vec![module])
        .await?
        .pop()
        .ok_or_else(|| AdminError::Internal("module expansion returned nothing".to_string()))
}

pub async fn list_modules(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<ApiResponse<Vec<ModuleView>>, AdminError> {
    let query = params.to_query("name")?;
    let page = state.modules.list(&query).await?;
    let modules = expand_modules(&state, page.items).await?;

    Ok(ApiResponse::ok("Modules fetched successfully", modules)
        .with_pagination(PaginationMeta::from_params(&params, page.total)))
}

pub async fn get_module(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<ApiResponse<ModuleView>, AdminError> {
    let id = RecordId::parse_path(&module_id, Module::LABEL)?;
    let module = state
        .modules
        .get(&id)
        .await?
        .ok_or(AdminError::not_found(Module::LABEL))?;

    Ok(ApiResponse::ok(
        "Module fetched successfully",
        expand_one(&state, module).await?,
    ))
}

pub async fn create_module(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateModule>,
) -> Result<ApiResponse<ModuleView>, AdminError> {
    let name = required_name(input.name.as_deref(), Module::LABEL)?;
    let screens = parse_references(Screen::LABEL, &input.screens)?;

    ensure_unique(state.modules.as_ref(), "name", &name, NameMatch::CaseInsensitive, None).await?;
    ensure_exist(state.screens.as_ref(), Screen::LABEL, &screens).await?;

    let now = timestamp::now();
    let module = state
        .modules
        .insert(Module {
            id: RecordId::generate(),
            name,
            screens,
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(module_id = %module.id, name = %module.name, "module created");
    Ok(ApiResponse::created(
        "Module created successfully",
        expand_one(&state, module).await?,
    ))
}

pub async fn update_module(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
    JsonBody(input): JsonBody<UpdateModule>,
) -> Result<ApiResponse<ModuleView>, AdminError> {
    let id = RecordId::parse_path(&module_id, Module::LABEL)?;
    let screens = input
        .screens
        .as_deref()
        .map(|raw| parse_references(Screen::LABEL, raw))
        .transpose()?;

    let mut module = state
        .modules
        .get(&id)
        .await?
        .ok_or(AdminError::not_found(Module::LABEL))?;

    if let Some(raw) = input.name.as_deref() {
        let name = required_name(Some(raw), Module::LABEL)?;
        ensure_unique(
            state.modules.as_ref(),
            "name",
            &name,
            NameMatch::CaseInsensitive,
            Some(&id),
        )
        .await?;
        module.name = name;
    }
    if let Some(screens) = screens {
        ensure_exist(state.screens.as_ref(), Screen::LABEL, &screens).await?;
        module.screens = screens;
    }
    module.updated_at = timestamp::now();

    let module = state
        .modules
        .replace(module)
        .await?
        .ok_or(AdminError::not_found(Module::LABEL))?;

    tracing::info!(module_id = %module.id, "module updated");
    Ok(ApiResponse::ok(
        "Module updated successfully",
        expand_one(&state, module).await?,
    ))
}

pub async fn delete_module(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<ApiResponse<()>, AdminError> {
    let id = RecordId::parse_path(&module_id, Module::LABEL)?;
    state
        .modules
        .delete(&id)
        .await?
        .ok_or(AdminError::not_found(Module::LABEL))?;

    tracing::info!(module_id = %id, "module deleted");
    Ok(ApiResponse::message("Module deleted successfully"))
}
