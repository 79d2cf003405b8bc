//! Screen model and its permission entries

use crate::core::error::AdminError;
use crate::core::id::RecordId;
use crate::core::record::{NameMatch, Record, UniqueField};
use crate::entities::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the role that is always granted every action on every screen
pub const SUPER_ADMIN_ROLE: &str = "superAdmin";

/// An action a role may perform on a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Read, Action::Create, Action::Update, Action::Delete];
}

/// Stored permission: one role and the actions it may perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub role: RecordId,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
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

impl Record for Screen {
    const COLLECTION: &'static str = "screens";
    const LABEL: &'static str = "Screen";

    fn unique_fields() -> &'static [UniqueField] {
        &[UniqueField {
            field: "name",
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

/// Permission entry as submitted, role ID not yet parsed
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionInput {
    pub role: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScreen {
    #[serde(alias = "screenName")]
    pub name: Option<String>,
    #[serde(default)]
    pub permissions: Vec<PermissionInput>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScreen {
    #[serde(alias = "screenName")]
    pub name: Option<String>,
    pub permissions: Option<Vec<PermissionInput>>,
    pub is_active: Option<bool>,
}

/// Parse submitted permissions.
///
/// Malformed role IDs fail with `InvalidReference`. Entries naming the same
/// role are merged and repeated actions collapse, keeping first-seen order.
pub fn parse_permissions(inputs: &[PermissionInput]) -> Result<Vec<Permission>, AdminError> {
    let mut permissions: Vec<Permission> = Vec::with_capacity(inputs.len());

    for input in inputs {
        let role = RecordId::parse(input.role.trim()).ok_or_else(|| AdminError::InvalidReference {
            field: Role::LABEL,
            id: input.role.clone(),
        })?;

        let index = match permissions.iter().position(|p| p.role == role) {
            Some(index) => index,
            None => {
                permissions.push(Permission {
                    role,
                    actions: Vec::new(),
                });
                permissions.len() - 1
            }
        };

        let actions = &mut permissions[index].actions;
        for action in &input.actions {
            if !actions.contains(action) {
                actions.push(*action);
            }
        }
    }

    Ok(permissions)
}

/// Add the superAdmin role with every action unless it is already listed.
///
/// An existing entry is left untouched even when it grants fewer actions.
pub fn grant_super_admin(permissions: &mut Vec<Permission>, super_admin: &RecordId) {
    if permissions.iter().any(|p| &p.role == super_admin) {
        return;
    }
    permissions.push(Permission {
        role: super_admin.clone(),
        actions: Action::ALL.to_vec(),
    });
}

/// Permission entry with its role expanded
#[derive(Debug, Clone, Serialize)]
pub struct PermissionView {
    pub role: Role,
    pub actions: Vec<Action>,
}

/// Screen as returned by the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenView {
    pub id: RecordId,
    pub name: String,
    pub permissions: Vec<PermissionView>,
    pub is_active: bool,
    #[serde(serialize_with = "crate::core::timestamp::serialize")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "crate::core::timestamp::serialize")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ADMIN: &str = "65f0c0ffee00000000000001";
    const VIEWER: &str = "65f0c0ffee00000000000002";

    fn input(role: &str, actions: &[Action]) -> PermissionInput {
        PermissionInput {
            role: role.to_string(),
            actions: actions.to_vec(),
        }
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result: Result<PermissionInput, _> =
            serde_json::from_value(json!({"role": ADMIN, "actions": ["read", "fly"]}));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_merges_and_dedupes() {
        let perms = parse_permissions(&[
            input(VIEWER, &[Action::Read, Action::Read]),
            input(ADMIN, &[Action::Create]),
            input(VIEWER, &[Action::Update, Action::Read]),
        ])
        .unwrap();

        assert_eq!(perms.len(), 2);
        assert_eq!(perms[0].role.as_str(), VIEWER);
        assert_eq!(perms[0].actions, vec![Action::Read, Action::Update]);
        assert_eq!(perms[1].actions, vec![Action::Create]);
    }

    #[test]
    fn test_parse_rejects_malformed_role() {
        let err = parse_permissions(&[input("nope", &[Action::Read])]).unwrap_err();
        assert!(matches!(err, AdminError::InvalidReference { field: "Role", .. }));
    }

    #[test]
    fn test_grant_super_admin() {
        let admin = RecordId::parse(ADMIN).unwrap();

        let mut perms = Vec::new();
        grant_super_admin(&mut perms, &admin);
        assert_eq!(perms.len(), 1);
        assert_eq!(perms[0].actions, Action::ALL.to_vec());

        let mut perms = parse_permissions(&[input(ADMIN, &[Action::Read])]).unwrap();
        grant_super_admin(&mut perms, &admin);
        assert_eq!(perms.len(), 1);
        assert_eq!(perms[0].actions, vec![Action::Read]);
    }

    #[test]
    fn test_create_accepts_legacy_name() {
        let body: CreateScreen = serde_json::from_value(json!({"screenName": "Invoices"})).unwrap();
        assert_eq!(body.name.as_deref(), Some("Invoices"));
        assert!(body.permissions.is_empty());
    }
}
