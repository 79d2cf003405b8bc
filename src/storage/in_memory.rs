//! In-memory repository for testing and development
//!
//! Records are kept as typed values and inspected through their JSON form,
//! so filtering, sorting and unique checks behave like the MongoDB backend
//! without a server.

use crate::core::error::StoreError;
use crate::core::id::RecordId;
use crate::core::query::{ListQuery, Page, SortDirection};
use crate::core::record::{NameMatch, Record};
use crate::core::service::Repository;
use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory repository implementation
///
/// Uses RwLock for thread-safe access. Cloning shares the same storage.
#[derive(Clone)]
pub struct InMemoryRepository<T> {
    records: Arc<RwLock<HashMap<RecordId, T>>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Backend(format!("Failed to acquire lock: {}", e))
}

/// Resolve a dotted path inside a JSON object.
fn field_at<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

fn field_str(record: &Value, field: &str) -> Option<String> {
    match field_at(record, field)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Missing and null sort first, then booleans, numbers, strings.
fn compare_json(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

impl<T: Record> InMemoryRepository<T> {
    fn snapshot(&self) -> Result<Vec<(T, Value)>, StoreError> {
        let records = self.records.read().map_err(lock_poisoned)?;
        records
            .values()
            .map(|r| -> Result<(T, Value), StoreError> {
                Ok((r.clone(), serde_json::to_value(r)?))
            })
            .collect()
    }

    /// Reject `candidate` if it collides with any other record on a unique field.
    fn check_unique(records: &HashMap<RecordId, T>, candidate: &T) -> Result<(), StoreError> {
        let unique = T::unique_fields();
        if unique.is_empty() {
            return Ok(());
        }

        let candidate_json = serde_json::to_value(candidate)?;
        for other in records.values().filter(|r| r.id() != candidate.id()) {
            let other_json = serde_json::to_value(other)?;
            for constraint in unique {
                let (Some(mine), Some(theirs)) = (
                    field_str(&candidate_json, constraint.field),
                    field_str(&other_json, constraint.field),
                ) else {
                    continue;
                };
                if constraint.matching.matches(&theirs, &mine) {
                    return Err(StoreError::Duplicate {
                        field: constraint.field.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Record> Repository<T> for InMemoryRepository<T> {
    async fn insert(&self, record: T) -> Result<T, StoreError> {
        let mut records = self.records.write().map_err(lock_poisoned)?;
        if records.contains_key(record.id()) {
            return Err(StoreError::Duplicate {
                field: "id".to_string(),
            });
        }
        Self::check_unique(&records, &record)?;
        records.insert(record.id().clone(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: &RecordId) -> Result<Option<T>, StoreError> {
        let records = self.records.read().map_err(lock_poisoned)?;
        Ok(records.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<T>, StoreError> {
        let records = self.records.read().map_err(lock_poisoned)?;
        Ok(ids.iter().filter_map(|id| records.get(id).cloned()).collect())
    }

    async fn find_one_by(
        &self,
        field: &str,
        value: &str,
        matching: NameMatch,
        exclude: Option<&RecordId>,
    ) -> Result<Option<T>, StoreError> {
        Ok(self
            .snapshot()?
            .into_iter()
            .filter(|(record, _)| exclude != Some(record.id()))
            .find(|(_, json)| {
                field_str(json, field).is_some_and(|stored| matching.matches(&stored, value))
            })
            .map(|(record, _)| record))
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<T>, StoreError> {
        let mut rows = self.snapshot()?;

        if let Some(search) = &query.search {
            let needle = search.term.to_lowercase();
            rows.retain(|(_, json)| {
                field_str(json, search.field)
                    .is_some_and(|value| value.to_lowercase().contains(&needle))
            });
        }

        let sort = &query.sort;
        rows.sort_by(|(a_rec, a), (b_rec, b)| {
            let ordering = compare_json(field_at(a, &sort.field), field_at(b, &sort.field))
                .then_with(|| a_rec.id().cmp(b_rec.id()));
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total = rows.len();
        let items = rows
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .map(|(record, _)| record)
            .collect();

        Ok(Page { items, total })
    }

    async fn replace(&self, record: T) -> Result<Option<T>, StoreError> {
        let mut records = self.records.write().map_err(lock_poisoned)?;
        if !records.contains_key(record.id()) {
            return Ok(None);
        }
        Self::check_unique(&records, &record)?;
        records.insert(record.id().clone(), record.clone());
        Ok(Some(record))
    }

    async fn delete(&self, id: &RecordId) -> Result<Option<T>, StoreError> {
        let mut records = self.records.write().map_err(lock_poisoned)?;
        Ok(records.remove(id))
    }

    async fn delete_many(&self, ids: &[RecordId]) -> Result<u64, StoreError> {
        let mut records = self.records.write().map_err(lock_poisoned)?;
        Ok(ids.iter().filter(|id| records.remove(*id).is_some()).count() as u64)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut records = self.records.write().map_err(lock_poisoned)?;
        let count = records.len() as u64;
        records.clear();
        Ok(count)
    }
}
