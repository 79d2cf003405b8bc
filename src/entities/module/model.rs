//! Module model: a named group of screens

use crate::core::id::RecordId;
use crate::core::record::{NameMatch, Record, UniqueField};
use crate::entities::screen::Screen;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: RecordId,
    pub name: String,
    /// Ordered screen references
    #[serde(default)]
    pub screens: Vec<RecordId>,
    #[serde(with = "crate::core::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::core::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Record for Module {
    const COLLECTION: &'static str = "modules";
    const LABEL: &'static str = "Module";

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
pub struct CreateModule {
    #[serde(alias = "moduleName")]
    pub name: Option<String>,
    #[serde(default)]
    pub screens: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateModule {
    #[serde(alias = "moduleName")]
    pub name: Option<String>,
    pub screens: Option<Vec<String>>,
}

/// Module with its screens expanded, in stored order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleView {
    pub id: RecordId,
    pub name: String,
    pub screens: Vec<Screen>,
    #[serde(serialize_with = "crate::core::timestamp::serialize")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "crate::core::timestamp::serialize")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_array_screens_rejected() {
        let result: Result<CreateModule, _> =
            serde_json::from_value(json!({"name": "Billing", "screens": "abc"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_stored_shape() {
        let module = Module {
            id: RecordId::parse("65f0c0ffee00000000000001").unwrap(),
            name: "Billing".to_string(),
            screens: vec![RecordId::parse("65f0c0ffee00000000000002").unwrap()],
            created_at: crate::core::timestamp::now(),
            updated_at: crate::core::timestamp::now(),
        };

        let value = serde_json::to_value(&module).unwrap();
        assert_eq!(value["id"], "65f0c0ffee00000000000001");
        assert_eq!(value["screens"], json!(["65f0c0ffee00000000000002"]));
        assert!(value["createdAt"].as_str().unwrap().ends_with('Z'));
    }
}
