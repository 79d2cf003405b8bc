//! Provider user model: a login account belonging to a provider

use crate::core::id::RecordId;
use crate::core::record::{NameMatch, Record, UniqueField};
use crate::entities::shared::normalize_email;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Stored account. The password hash never leaves the server: responses use
/// [`ProviderUserView`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUser {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub provider: RecordId,
    #[serde(with = "crate::core::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::core::timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Record for ProviderUser {
    const COLLECTION: &'static str = "provider_users";
    const LABEL: &'static str = "User";

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
pub struct CreateProviderUser {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Provider ID, or provider name when not ID-shaped
    #[serde(default)]
    #[validate(length(min = 1, message = "Provider is required"))]
    pub provider: String,

    pub is_active: Option<bool>,
}

impl CreateProviderUser {
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self.email = normalize_email(&self.email);
        self.provider = self.provider.trim().to_string();
        self
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProviderUser {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    pub username: Option<String>,

    #[validate(email(message = "A valid email is required"))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: Option<String>,

    #[validate(length(min = 1, message = "Provider must not be empty"))]
    pub provider: Option<String>,

    pub is_active: Option<bool>,
}

impl UpdateProviderUser {
    pub fn normalized(mut self) -> Self {
        self.username = self.username.map(|u| u.trim().to_string());
        self.email = self.email.map(|e| normalize_email(&e));
        self.provider = self.provider.map(|p| p.trim().to_string());
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteUsers {
    #[serde(default)]
    pub user_ids: Vec<String>,
}

/// Account as returned by the API, with the provider expanded as `P`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderUserView<P: Serialize> {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    /// `None` when the provider has since been removed
    pub provider: Option<P>,
    #[serde(serialize_with = "crate::core::timestamp::serialize")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "crate::core::timestamp::serialize")]
    pub updated_at: DateTime<Utc>,
}

impl<P: Serialize> ProviderUserView<P> {
    pub fn new(user: ProviderUser, provider: Option<P>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            is_active: user.is_active,
            provider,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_view_omits_password_hash() {
        let user = ProviderUser {
            id: RecordId::generate(),
            username: "ops".to_string(),
            email: "ops@acme.io".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            is_active: true,
            provider: RecordId::generate(),
            created_at: crate::core::timestamp::now(),
            updated_at: crate::core::timestamp::now(),
        };

        let body = serde_json::to_value(ProviderUserView::<()>::new(user, None)).unwrap();
        assert!(body.get("passwordHash").is_none());
        assert!(!body.to_string().contains("argon2"));
        assert_eq!(body["provider"], json!(null));
    }

    #[test]
    fn test_missing_fields_fail_validation() {
        let input: CreateProviderUser =
            serde_json::from_value(json!({"email": "ops@acme.io"})).unwrap();
        let errors = input.normalized().validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("provider"));
    }
}
