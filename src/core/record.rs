//! Record trait shared by every stored entity

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::id::RecordId;

/// How a unique field compares values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    /// Byte-for-byte equality with the stored value
    Exact,
    /// Equality ignoring ASCII/Unicode case
    CaseInsensitive,
}

impl NameMatch {
    pub fn matches(self, stored: &str, candidate: &str) -> bool {
        match self {
            NameMatch::Exact => stored == candidate,
            NameMatch::CaseInsensitive => stored.to_lowercase() == candidate.to_lowercase(),
        }
    }
}

/// A field the store must keep unique across a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueField {
    pub field: &'static str,
    pub matching: NameMatch,
}

/// Base trait for all stored records.
///
/// Records serialize with camelCase field names and an `id` field; storage
/// backends map `id` to their own key convention.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name in the store (e.g. "roles")
    const COLLECTION: &'static str;

    /// Human-facing label used in messages (e.g. "Role")
    const LABEL: &'static str;

    /// Fields backed by a unique constraint
    fn unique_fields() -> &'static [UniqueField] {
        &[]
    }

    fn id(&self) -> &RecordId;

    fn created_at(&self) -> DateTime<Utc>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_match() {
        assert!(NameMatch::Exact.matches("Billing", "Billing"));
        assert!(!NameMatch::Exact.matches("Billing", "billing"));
        assert!(NameMatch::CaseInsensitive.matches("Billing", "bILLING"));
        assert!(!NameMatch::CaseInsensitive.matches("Billing", "Billings"));
    }
}
