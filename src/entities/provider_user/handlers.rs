//! Provider user HTTP handlers

use super::model::{
    BulkDeleteUsers, CreateProviderUser, ProviderUser, ProviderUserView, UpdateProviderUser,
};
use crate::core::error::AdminError;
use crate::core::extract::{JsonBody, QueryParams};
use crate::core::id::RecordId;
use crate::core::password::hash_password;
use crate::core::query::{ListParams, ListQuery, PaginationMeta, SortSpec};
use crate::core::record::{NameMatch, Record};
use crate::core::references::{lookup_map, validate_references};
use crate::core::response::ApiResponse;
use crate::core::timestamp;
use crate::entities::provider::{Provider, ProviderSummary};
use crate::entities::shared::ensure_unique;
use crate::server::state::AppState;
use axum::extract::{Path, State};
use validator::Validate;

/// Resolve a provider given by ID or, when not ID-shaped, by exact name.
async fn resolve_provider(state: &AppState, raw: &str) -> Result<RecordId, AdminError> {
    if RecordId::parse(raw).is_some() {
        let mut ids =
            validate_references(state.providers.as_ref(), Provider::LABEL, &[raw.to_string()])
                .await?;
        return ids
            .pop()
            .ok_or_else(|| AdminError::Internal("provider validation returned nothing".to_string()));
    }

    state
        .providers
        .find_one_by("name", raw, NameMatch::Exact, None)
        .await?
        .map(|provider| provider.id)
        .ok_or(AdminError::not_found(Provider::LABEL))
}

/// `GET /provider-users/users?page=&limit=`: newest first, provider reduced
/// to its identity fields.
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> Result<ApiResponse<Vec<ProviderUserView<ProviderSummary>>>, AdminError> {
    let query = ListQuery {
        skip: params.skip(),
        limit: params.limit(),
        search: None,
        sort: SortSpec::default(),
    };
    let page = state.provider_users.list(&query).await?;

    let providers = lookup_map(
        state.providers.as_ref(),
        page.items.iter().map(|user| &user.provider),
    )
    .await?;

    let users = page
        .items
        .into_iter()
        .map(|user| {
            let provider = providers.get(&user.provider).map(ProviderSummary::from);
            ProviderUserView::new(user, provider)
        })
        .collect();

    Ok(ApiResponse::ok("Users fetched successfully", users)
        .with_pagination(PaginationMeta::from_params(&params, page.total)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<ProviderUserView<Provider>>, AdminError> {
    let id = RecordId::parse_path(&user_id, ProviderUser::LABEL)?;
    let user = state
        .provider_users
        .get(&id)
        .await?
        .ok_or(AdminError::not_found(ProviderUser::LABEL))?;

    let provider = state.providers.get(&user.provider).await?;
    Ok(ApiResponse::ok(
        "User fetched successfully",
        ProviderUserView::new(user, provider),
    ))
}

pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateProviderUser>,
) -> Result<ApiResponse<ProviderUserView<ProviderSummary>>, AdminError> {
    let input = input.normalized();
    input.validate()?;

    ensure_unique(state.provider_users.as_ref(), "email", &input.email, NameMatch::Exact, None).await?;
    let provider_id = resolve_provider(&state, &input.provider).await?;
    let password_hash = hash_password(&input.password)?;

    let now = timestamp::now();
    let user = state
        .provider_users
        .insert(ProviderUser {
            id: RecordId::generate(),
            username: input.username,
            email: input.email,
            password_hash,
            is_active: input.is_active.unwrap_or(true),
            provider: provider_id,
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(user_id = %user.id, provider_id = %user.provider, "provider user created");
    let provider = state.providers.get(&user.provider).await?;
    Ok(ApiResponse::created(
        "User created successfully",
        ProviderUserView::new(user, provider.as_ref().map(ProviderSummary::from)),
    ))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    JsonBody(input): JsonBody<UpdateProviderUser>,
) -> Result<ApiResponse<ProviderUserView<ProviderSummary>>, AdminError> {
    let id = RecordId::parse_path(&user_id, ProviderUser::LABEL)?;
    let input = input.normalized();
    input.validate()?;

    let mut user = state
        .provider_users
        .get(&id)
        .await?
        .ok_or(AdminError::not_found(ProviderUser::LABEL))?;

    if let Some(email) = input.email {
        ensure_unique(state.provider_users.as_ref(), "email", &email, NameMatch::Exact, Some(&id)).await?;
        user.email = email;
    }
    if let Some(provider) = input.provider.as_deref() {
        user.provider = resolve_provider(&state, provider).await?;
    }
    if let Some(password) = input.password.as_deref() {
        user.password_hash = hash_password(password)?;
    }
    if let Some(username) = input.username {
        user.username = username;
    }
    if let Some(is_active) = input.is_active {
        user.is_active = is_active;
    }
    user.updated_at = timestamp::now();

    let user = state
        .provider_users
        .replace(user)
        .await?
        .ok_or(AdminError::not_found(ProviderUser::LABEL))?;

    tracing::info!(user_id = %user.id, "provider user updated");
    let provider = state.providers.get(&user.provider).await?;
    Ok(ApiResponse::ok(
        "User updated successfully",
        ProviderUserView::new(user, provider.as_ref().map(ProviderSummary::from)),
    ))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<()>, AdminError> {
    let id = RecordId::parse_path(&user_id, ProviderUser::LABEL)?;
    state
        .provider_users
        .delete(&id)
        .await?
        .ok_or(AdminError::not_found(ProviderUser::LABEL))?;

    tracing::info!(user_id = %id, "provider user deleted");
    Ok(ApiResponse::message("User deleted successfully"))
}

/// Delete the listed users; 404 when none of them existed.
pub async fn bulk_delete_users(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<BulkDeleteUsers>,
) -> Result<ApiResponse<()>, AdminError> {
    if input.user_ids.is_empty() {
        return Err(AdminError::validation("Please provide an array of user IDs"));
    }

    let ids: Vec<RecordId> = input
        .user_ids
        .iter()
        .filter_map(|raw| RecordId::parse(raw.trim()))
        .collect();
    let deleted = state.provider_users.delete_many(&ids).await?;

    if deleted == 0 {
        return Err(AdminError::not_found("Users"));
    }

    tracing::info!(requested = input.user_ids.len(), deleted, "provider users bulk deleted");
    Ok(ApiResponse::deleted(
        format!("{} users deleted successfully", deleted),
        deleted,
    ))
}

pub async fn delete_all_users(State(state): State<AppState>) -> Result<ApiResponse<()>, AdminError> {
    let deleted = state.provider_users.delete_all().await?;

    tracing::warn!(deleted, "all provider users deleted");
    Ok(ApiResponse::deleted(
        format!("{} users deleted successfully", deleted),
        deleted,
    ))
}
