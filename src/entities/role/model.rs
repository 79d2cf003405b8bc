//! Role model: an ordered set of modules granted to a role

use crate::core::id::RecordId;
use crate::core::record::{NameMatch, Record, UniqueField};
use crate::entities::module::ModuleView;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub modules: Vec<RecordId>,
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

impl Record for Role {
    const COLLECTION: &'static str = "roles";
    const LABEL: &'static str = "Role";

    fn unique_fields() -> &'static [UniqueField] {
        &[UniqueField {
            field: "name",
            matching: NameMatch::CaseInsensitive,
        }]
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRole {
    #[serde(alias = "roleName")]
    pub name: Option<String>,
    #[serde(default)]
    pub modules: Vec<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRole {
    #[serde(alias = "roleName")]
    pub name: Option<String>,
    pub modules: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Role with modules expanded two levels deep (modules, then their screens)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleView {
    pub id: RecordId,
    pub name: String,
    pub modules: Vec<ModuleView>,
    pub is_active: bool,
    #[serde(serialize_with = "crate::core::timestamp::serialize")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "crate::core::timestamp::serialize")]
    pub updated_at: DateTime<Utc>,
}
