//! Provider model: the operator that owns a set of tenant clients

use crate::core::id::RecordId;
use crate::core::record::{NameMatch, Record, UniqueField};
use crate::entities::shared::normalize_email;
use crate::entities::tenant::Tenant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Clients shown per page by `GET /providers/getProvider`
pub const CLIENTS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    /// Tenant references
    #[serde(default)]
    pub clients: Vec<RecordId>,
    #[serde(with = "crate::core::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::core::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Record for Provider {
    const COLLECTION: &'static str = "providers";
    const LABEL: &'static str = "Provider";

    fn unique_fields() -> &'static [UniqueField] {
        &[UniqueField {
            field: "email",
            matching: NameMatch::Exact,
        }]
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Identity fields of a provider, used when embedding it in other records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSummary {
    pub id: RecordId,
    pub name: String,
    pub email: String,
}

impl From<&Provider> for ProviderSummary {
    fn from(provider: &Provider) -> Self {
        Self {
            id: provider.id.clone(),
            name: provider.name.clone(),
            email: provider.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProvider {
    #[serde(default, alias = "provName")]
    #[validate(length(min = 1, message = "Provider name is required"))]
    pub name: String,

    #[serde(default, alias = "provEmail")]
    #[validate(email(message = "A valid provider email is required"))]
    pub email: String,

    #[serde(default, alias = "provClients")]
    pub clients: Vec<String>,
}

impl CreateProvider {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);
        self
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProvider {
    #[serde(alias = "provName")]
    #[validate(length(min = 1, message = "Provider name is required"))]
    pub name: Option<String>,

    #[serde(alias = "provEmail")]
    #[validate(email(message = "A valid provider email is required"))]
    pub email: Option<String>,

    #[serde(alias = "provClients")]
    pub clients: Option<Vec<String>>,
}

impl UpdateProvider {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self.email = self.email.map(|e| normalize_email(&e));
        self
    }
}

/// `page` query of `GET /providers/getProvider`, counted from 0
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientPageParams {
    #[serde(default)]
    pub page: usize,
}

/// Provider with one page of its clients expanded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderView {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub clients: Vec<Tenant>,
    #[serde(serialize_with = "crate::core::timestamp::serialize")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "crate::core::timestamp::serialize")]
    pub updated_at: DateTime<Utc>,
}

/// The slice of client references shown on `page` (0-based)
pub fn client_page(clients: &[RecordId], page: usize) -> &[RecordId] {
    let start = page.saturating_mul(CLIENTS_PER_PAGE).min(clients.len());
    let end = start.saturating_add(CLIENTS_PER_PAGE).min(clients.len());
    &clients[start..end]
}
