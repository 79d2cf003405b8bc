//! Tenant (subscriber) model

use crate::core::id::RecordId;
use crate::core::record::{NameMatch, Record, UniqueField};
use crate::entities::shared::normalize_email;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(with = "crate::core::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::core::timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Record for Tenant {
    const COLLECTION: &'static str = "tenants";
    const LABEL: &'static str = "Tenant";

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

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenant {
    #[serde(default, alias = "subsName")]
    #[validate(length(min = 3, max = 100, message = "Tenant name must be between 3 and 100 characters"))]
    pub name: String,

    #[serde(default, alias = "subsEmail")]
    #[validate(email(message = "A valid tenant email is required"))]
    pub email: String,

    pub is_active: Option<bool>,
}

impl CreateTenant {
    /// Trim the name and normalize the email before validation
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);
        self
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTenant {
    #[serde(alias = "subsName")]
    #[validate(length(min = 3, max = 100, message = "Tenant name must be between 3 and 100 characters"))]
    pub name: Option<String>,

    #[serde(alias = "subsEmail")]
    #[validate(email(message = "A valid tenant email is required"))]
    pub email: Option<String>,

    pub is_active: Option<bool>,
}

impl UpdateTenant {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self.email = self.email.map(|e| normalize_email(&e));
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteTenants {
    #[serde(default)]
    pub tenant_ids: Vec<String>,
}
