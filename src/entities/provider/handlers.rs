//! Provider HTTP handlers

use super::model::{
    CLIENTS_PER_PAGE, ClientPageParams, CreateProvider, Provider, ProviderView, UpdateProvider,
    client_page,
};
use crate::core::error::AdminError;
use crate::core::extract::{JsonBody, QueryParams};
use crate::core::id::RecordId;
use crate::core::query::PaginationMeta;
use crate::core::record::{NameMatch, Record};
use crate::core::references::{ensure_exist, expand_ordered, parse_references};
use crate::core::response::ApiResponse;
use crate::core::timestamp;
use crate::entities::shared::ensure_unique;
use crate::entities::tenant::Tenant;
use crate::server::state::AppState;
use axum::extract::{Path, State};
use validator::Validate;

async fn expand_provider(
    state: &AppState,
    provider: Provider,
    page: usize,
) -> Result<(ProviderView, PaginationMeta), AdminError> {
    let clients = expand_ordered(state.tenants.as_ref(), client_page(&provider.clients, page)).await?;
    let pagination = PaginationMeta::new(page, CLIENTS_PER_PAGE, provider.clients.len());

    Ok((
        ProviderView {
            id: provider.id,
            name: provider.name,
            email: provider.email,
            clients,
            created_at: provider.created_at,
            updated_at: provider.updated_at,
        },
        pagination,
    ))
}

/// `GET /providers/getProvider?page=N`: the first provider with one page of
/// its clients. Pages are counted from 0.
pub async fn get_provider(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ClientPageParams>,
) -> Result<ApiResponse<ProviderView>, AdminError> {
    let provider = state
        .providers
        .first()
        .await?
        .ok_or(AdminError::not_found(Provider::LABEL))?;

    let (view, pagination) = expand_provider(&state, provider, params.page).await?;
    Ok(ApiResponse::ok("Provider fetched successfully", view).with_pagination(pagination))
}

pub async fn create_provider(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateProvider>,
) -> Result<ApiResponse<ProviderView>, AdminError> {
    let input = input.normalized();
    input.validate()?;
    let clients = parse_references(Tenant::LABEL, &input.clients)?;

    ensure_unique(state.providers.as_ref(), "email", &input.email, NameMatch::Exact, None).await?;
    ensure_exist(state.tenants.as_ref(), Tenant::LABEL, &clients).await?;

    let now = timestamp::now();
    let provider = state
        .providers
        .insert(Provider {
            id: RecordId::generate(),
            name: input.name,
            email: input.email,
            clients,
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(provider_id = %provider.id, "provider created");
    let (view, pagination) = expand_provider(&state, provider, 0).await?;
    Ok(ApiResponse::created("Provider created successfully", view).with_pagination(pagination))
}

pub async fn update_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<String>,
    JsonBody(input): JsonBody<UpdateProvider>,
) -> Result<ApiResponse<ProviderView>, AdminError> {
    let id = RecordId::parse_path(&provider_id, Provider::LABEL)?;
    let input = input.normalized();
    input.validate()?;
    let clients = input
        .clients
        .as_deref()
        .map(|raw| parse_references(Tenant::LABEL, raw))
        .transpose()?;

    let mut provider = state
        .providers
        .get(&id)
        .await?
        .ok_or(AdminError::not_found(Provider::LABEL))?;

    if let Some(email) = input.email {
        ensure_unique(state.providers.as_ref(), "email", &email, NameMatch::Exact, Some(&id)).await?;
        provider.email = email;
    }
    if let Some(name) = input.name {
        provider.name = name;
    }
    if let Some(clients) = clients {
        ensure_exist(state.tenants.as_ref(), Tenant::LABEL, &clients).await?;
        provider.clients = clients;
    }
    provider.updated_at = timestamp::now();

    let provider = state
        .providers
        .replace(provider)
        .await?
        .ok_or(AdminError::not_found(Provider::LABEL))?;

    tracing::info!(provider_id = %provider.id, "provider updated");
    let (view, pagination) = expand_provider(&state, provider, 0).await?;
    Ok(ApiResponse::ok("Provider updated successfully", view).with_pagination(pagination))
}
