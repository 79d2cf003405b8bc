//! Referential validation of foreign-key sets
//!
//! Every write that stores references (module screens, role modules, screen
//! permission roles, provider clients, provider-user provider) goes through
//! [`validate_references`]: shape check first, then a single bulk lookup.

use std::collections::{HashMap, HashSet};

use super::error::AdminError;
use super::id::RecordId;
use super::record::Record;
use super::service::Repository;

/// Parse every candidate ID, failing on the first malformed one.
///
/// Duplicates collapse to their first occurrence.
pub fn parse_references(field: &'static str, raw_ids: &[String]) -> Result<Vec<RecordId>, AdminError> {
    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(raw_ids.len());

    for raw in raw_ids {
        let id = RecordId::parse(raw.trim()).ok_or_else(|| AdminError::InvalidReference {
            field,
            id: raw.clone(),
        })?;
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }

    Ok(ids)
}

/// Check that every ID in `raw_ids` names an existing record in `repo`.
///
/// Returns the parsed IDs in request order. Malformed IDs fail with
/// `InvalidReference` before the store is touched; well-formed IDs with no
/// record fail with `MissingReferences` listing exactly those IDs.
pub async fn validate_references<T: Record>(
    repo: &dyn Repository<T>,
    field: &'static str,
    raw_ids: &[String],
) -> Result<Vec<RecordId>, AdminError> {
    let ids = parse_references(field, raw_ids)?;
    ensure_exist(repo, field, &ids).await?;
    Ok(ids)
}

/// Existence half of [`validate_references`] for already parsed IDs.
///
/// One bulk lookup; missing = requested minus found, in request order.
pub async fn ensure_exist<T: Record>(
    repo: &dyn Repository<T>,
    field: &'static str,
    ids: &[RecordId],
) -> Result<(), AdminError> {
    if ids.is_empty() {
        return Ok(());
    }

    let found: HashSet<RecordId> = repo
        .find_by_ids(ids)
        .await?
        .iter()
        .map(|record| record.id().clone())
        .collect();

    let mut reported = HashSet::new();
    let missing: Vec<String> = ids
        .iter()
        .filter(|id| !found.contains(*id) && reported.insert(*id))
        .map(|id| id.to_string())
        .collect();

    if !missing.is_empty() {
        tracing::debug!(field, missing = ?missing, "rejecting dangling references");
        return Err(AdminError::MissingReferences { field, ids: missing });
    }

    Ok(())
}

/// Fetch the records behind `ids` in one lookup, keyed by ID.
pub async fn lookup_map<'a, T: Record>(
    repo: &dyn Repository<T>,
    ids: impl IntoIterator<Item = &'a RecordId>,
) -> Result<HashMap<RecordId, T>, AdminError> {
    let mut seen = HashSet::new();
    let ids: Vec<RecordId> = ids
        .into_iter()
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(repo
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|record| (record.id().clone(), record))
        .collect())
}

/// Pick records out of `map` in the order of `ids`, skipping dangling ones.
pub fn pick_ordered<T: Clone>(map: &HashMap<RecordId, T>, ids: &[RecordId]) -> Vec<T> {
    ids.iter().filter_map(|id| map.get(id).cloned()).collect()
}

/// Fetch the records behind `ids`, in the order of `ids`.
///
/// References whose record no longer exists are skipped.
pub async fn expand_ordered<T: Record>(
    repo: &dyn Repository<T>,
    ids: &[RecordId],
) -> Result<Vec<T>, AdminError> {
    let map = lookup_map(repo, ids).await?;
    Ok(pick_ordered(&map, ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StoreError;
    use crate::core::query::{ListQuery, Page};
    use crate::core::record::NameMatch;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Thing {
        id: RecordId,
        #[serde(with = "crate::core::timestamp")]
        created_at: DateTime<Utc>,
    }

    impl Record for Thing {
        const COLLECTION: &'static str = "things";
        const LABEL: &'static str = "Thing";

        fn id(&self) -> &RecordId {
            &self.id
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }
    }

    /// Repository holding a fixed set of IDs that counts lookups
    struct FixedRepo {
        existing: Vec<RecordId>,
        lookups: AtomicUsize,
    }

    impl FixedRepo {
        fn with(existing: &[&str]) -> Self {
            Self {
                existing: existing.iter().map(|s| RecordId::parse(s).unwrap()).collect(),
                lookups: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Repository<Thing> for FixedRepo {
        async fn insert(&self, record: Thing) -> Result<Thing, StoreError> {
            Ok(record)
        }
        async fn get(&self, _id: &RecordId) -> Result<Option<Thing>, StoreError> {
            Ok(None)
        }
        async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Thing>, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .existing
                .iter()
                .filter(|id| ids.contains(id))
                .map(|id| Thing {
                    id: id.clone(),
                    created_at: Utc::now(),
                })
                .collect())
        }
        async fn find_one_by(
            &self,
            _field: &str,
            _value: &str,
            _matching: NameMatch,
            _exclude: Option<&RecordId>,
        ) -> Result<Option<Thing>, StoreError> {
            Ok(None)
        }
        async fn list(&self, _query: &ListQuery) -> Result<Page<Thing>, StoreError> {
            Ok(Page {
                items: Vec::new(),
                total: 0,
            })
        }
        async fn replace(&self, _record: Thing) -> Result<Option<Thing>, StoreError> {
            Ok(None)
        }
        async fn delete(&self, _id: &RecordId) -> Result<Option<Thing>, StoreError> {
            Ok(None)
        }
        async fn delete_many(&self, _ids: &[RecordId]) -> Result<u64, StoreError> {
            Ok(0)
        }
        async fn delete_all(&self) -> Result<u64, StoreError> {
            Ok(0)
        }
    }

    const A: &str = "65f0c0ffee0000000000000a";
    const B: &str = "65f0c0ffee0000000000000b";
    const X: &str = "65f0c0ffee000000000000ff";
    const Y: &str = "65f0c0ffee000000000000fe";

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_all_present() {
        let repo = FixedRepo::with(&[A, B]);
        let ids = validate_references::<Thing>(&repo, "Screen", &strings(&[B, A, B]))
            .await
            .unwrap();
        let ids: Vec<&str> = ids.iter().map(RecordId::as_str).collect();
        assert_eq!(ids, vec![B, A]);
    }

    #[tokio::test]
    async fn test_malformed_fails_before_lookup() {
        let repo = FixedRepo::with(&[A]);
        let err = validate_references::<Thing>(&repo, "Screen", &strings(&[A, "abc", X]))
            .await
            .unwrap_err();

        assert!(matches!(err, AdminError::InvalidReference { ref id, .. } if id == "abc"));
        assert_eq!(repo.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_listed_exactly() {
        let repo = FixedRepo::with(&[A, B]);
        let err = validate_references::<Thing>(&repo, "Module", &strings(&[X, A, Y, X]))
            .await
            .unwrap_err();

        match err {
            AdminError::MissingReferences { field, ids } => {
                assert_eq!(field, "Module");
                assert_eq!(ids, strings(&[X, Y]));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(repo.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_set_skips_lookup() {
        let repo = FixedRepo::with(&[]);
        assert!(validate_references::<Thing>(&repo, "Role", &[]).await.unwrap().is_empty());
        assert_eq!(repo.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expand_keeps_order_and_skips_dangling() {
        let repo = FixedRepo::with(&[A, B]);
        let ids = parse_references("Screen", &strings(&[B, X, A])).unwrap();
        let things = expand_ordered::<Thing>(&repo, &ids).await.unwrap();
        let got: Vec<&str> = things.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(got, vec![B, A]);
    }
}
