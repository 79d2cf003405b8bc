//! Repository trait implemented by every storage backend

use async_trait::async_trait;

use super::error::StoreError;
use super::id::RecordId;
use super::query::{ListQuery, Page, SortDirection, SortSpec};
use super::record::{NameMatch, Record};

/// Storage operations for one record type.
///
/// One repository is constructed per entity at startup and shared by
/// handlers through the application state. Implementations must enforce
/// `T::unique_fields()` and report violations as [`StoreError::Duplicate`].
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// Insert a new record
    async fn insert(&self, record: T) -> Result<T, StoreError>;

    /// Fetch a record by ID
    async fn get(&self, id: &RecordId) -> Result<Option<T>, StoreError>;

    /// Fetch every record whose ID is in `ids` (one round-trip, any order)
    async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<T>, StoreError>;

    /// Find one record whose `field` equals `value`, optionally ignoring one ID
    async fn find_one_by(
        &self,
        field: &str,
        value: &str,
        matching: NameMatch,
        exclude: Option<&RecordId>,
    ) -> Result<Option<T>, StoreError>;

    /// List one page of records plus the total matching count
    async fn list(&self, query: &ListQuery) -> Result<Page<T>, StoreError>;

    /// Replace a stored record; `None` if it no longer exists
    async fn replace(&self, record: T) -> Result<Option<T>, StoreError>;

    /// Delete a record, returning what was removed
    async fn delete(&self, id: &RecordId) -> Result<Option<T>, StoreError>;

    /// Delete every record whose ID is in `ids`, returning the actual count
    async fn delete_many(&self, ids: &[RecordId]) -> Result<u64, StoreError>;

    /// Delete the whole collection's contents
    async fn delete_all(&self) -> Result<u64, StoreError>;

    /// Oldest record in the collection
    async fn first(&self) -> Result<Option<T>, StoreError> {
        let query = ListQuery {
            skip: 0,
            limit: 1,
            search: None,
            sort: SortSpec {
                field: "createdAt".to_string(),
                direction: SortDirection::Asc,
            },
        };
        Ok(self.list(&query).await?.items.into_iter().next())
    }
}
