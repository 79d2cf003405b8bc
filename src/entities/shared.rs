//! Helpers shared by the entity handlers

use crate::core::error::AdminError;
use crate::core::id::RecordId;
use crate::core::record::{NameMatch, Record};
use crate::core::service::Repository;

/// Trim a required name, rejecting blank values.
pub fn required_name(raw: Option<&str>, label: &str) -> Result<String, AdminError> {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(AdminError::validation(format!("{} name is required", label))),
    }
}

/// Trim and lower-case an email address
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Fail with 409 when another record already holds `value` in `field`.
pub async fn ensure_unique<T: Record>(
    repo: &dyn Repository<T>,
    field: &str,
    value: &str,
    matching: NameMatch,
    exclude: Option<&RecordId>,
) -> Result<(), AdminError> {
    if repo.find_one_by(field, value, matching, exclude).await?.is_some() {
        return Err(AdminError::conflict(format!(
            "{} with this {} already exists",
            T::LABEL,
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_name() {
        assert_eq!(required_name(Some("  Billing "), "Module").unwrap(), "Billing");
        assert!(required_name(Some("   "), "Module").is_err());
        let err = required_name(None, "Role").unwrap_err();
        assert_eq!(err.to_string(), "Role name is required");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ops@Example.COM "), "ops@example.com");
    }
}
