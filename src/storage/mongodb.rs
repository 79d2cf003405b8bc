//! MongoDB repository using the official MongoDB async driver.
//!
//! # Storage model
//!
//! MongoDB uses a **collection-per-record-type** pattern. Each
//! `MongoRepository<T>` operates on the collection named by
//! `T::COLLECTION` (e.g., "roles", "tenants").
//!
//! # Serialization strategy
//!
//! Records are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. IDs are stored as 24-hex strings and
//! timestamps as fixed-width RFC 3339 strings, so both sort correctly.
//! The `id` field is mapped to MongoDB's `_id` convention.

use crate::core::error::StoreError;
use crate::core::id::RecordId;
use crate::core::query::{ListQuery, Page};
use crate::core::record::{NameMatch, Record};
use crate::core::service::Repository;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{Collation, CollationStrength, IndexOptions};
use mongodb::{Database, IndexModel};

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> Result<Document, StoreError> {
    let mut doc = match mongodb::bson::to_bson(&json)? {
        Bson::Document(d) => d,
        _ => {
            return Err(StoreError::Serialization(
                "Expected BSON document, got non-object".to_string(),
            ));
        }
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id` for record convention.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

/// Map record field names onto stored field names.
fn stored_field(field: &str) -> &str {
    if field == "id" { "_id" } else { field }
}

fn id_list(ids: &[RecordId]) -> Vec<String> {
    ids.iter().map(|id| id.as_str().to_string()).collect()
}

/// Anchored, case-insensitive regex condition for exact matching ignoring case.
fn case_insensitive_equals(value: &str) -> Document {
    doc! { "$regex": format!("^{}$", regex::escape(value)), "$options": "i" }
}

/// Unanchored, case-insensitive substring condition.
fn case_insensitive_contains(value: &str) -> Document {
    doc! { "$regex": regex::escape(value), "$options": "i" }
}

/// Collation that treats values differing only by case as equal
fn case_insensitive_collation() -> Collation {
    Collation::builder()
        .locale("en".to_string())
        .strength(CollationStrength::Secondary)
        .build()
}

// ---------------------------------------------------------------------------
// MongoRepository<T>
// ---------------------------------------------------------------------------

/// Generic repository backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let roles = MongoRepository::<Role>::new(client.database("admin_db"));
/// roles.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoRepository<T> {
    database: Database,
    _marker: std::marker::PhantomData<T>,
}

impl<T> MongoRepository<T> {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: Record> MongoRepository<T> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::COLLECTION)
    }

    /// Create the unique indexes declared by `T::unique_fields()`.
    ///
    /// Case-insensitive fields get a secondary-strength collation so the
    /// index itself rejects names differing only by case. Idempotent.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let indexes: Vec<IndexModel> = T::unique_fields()
            .iter()
            .map(|unique| {
                let options = match unique.matching {
                    NameMatch::Exact => IndexOptions::builder().unique(true).build(),
                    NameMatch::CaseInsensitive => IndexOptions::builder()
                        .unique(true)
                        .collation(case_insensitive_collation())
                        .build(),
                };
                IndexModel::builder()
                    .keys(doc! { unique.field: 1 })
                    .options(options)
                    .build()
            })
            .collect();

        if indexes.is_empty() {
            return Ok(());
        }

        self.collection().create_indexes(indexes).await?;
        tracing::debug!(collection = T::COLLECTION, "unique indexes ensured");
        Ok(())
    }

    fn record_to_document(record: &T) -> Result<Document, StoreError> {
        json_to_document(serde_json::to_value(record)?)
    }

    fn document_to_record(doc: Document) -> Result<T, StoreError> {
        Ok(serde_json::from_value(document_to_json(doc))?)
    }

    async fn collect(
        cursor: mongodb::Cursor<Document>,
    ) -> Result<Vec<T>, StoreError> {
        let docs: Vec<Document> = cursor.try_collect().await?;
        docs.into_iter().map(Self::document_to_record).collect()
    }
}

#[async_trait]
impl<T: Record> Repository<T> for MongoRepository<T> {
    async fn insert(&self, record: T) -> Result<T, StoreError> {
        let doc = Self::record_to_document(&record)?;
        self.collection().insert_one(doc).await?;
        Ok(record)
    }

    async fn get(&self, id: &RecordId) -> Result<Option<T>, StoreError> {
        self.collection()
            .find_one(doc! { "_id": id.as_str() })
            .await?
            .map(Self::document_to_record)
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<T>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .collection()
            .find(doc! { "_id": { "$in": id_list(ids) } })
            .await?;
        Self::collect(cursor).await
    }

    async fn find_one_by(
        &self,
        field: &str,
        value: &str,
        matching: NameMatch,
        exclude: Option<&RecordId>,
    ) -> Result<Option<T>, StoreError> {
        let mut filter = match matching {
            NameMatch::Exact => doc! { stored_field(field): value },
            NameMatch::CaseInsensitive => {
                doc! { stored_field(field): case_insensitive_equals(value) }
            }
        };
        if let Some(id) = exclude {
            filter.insert("_id", doc! { "$ne": id.as_str() });
        }

        self.collection()
            .find_one(filter)
            .await?
            .map(Self::document_to_record)
            .transpose()
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<T>, StoreError> {
        let filter = match &query.search {
            Some(search) => doc! { search.field: case_insensitive_contains(&search.term) },
            None => doc! {},
        };

        let total = self.collection().count_documents(filter.clone()).await?;

        let direction = query.sort.direction.as_i32();
        let sort_field = stored_field(&query.sort.field);
        let mut sort = doc! { sort_field: direction };
        if sort_field != "_id" {
            sort.insert("_id", direction);
        }

        let collection = self.collection();
        let skip = u64::try_from(query.skip).unwrap_or(u64::MAX).min(i64::MAX as u64);
        let mut find = collection.find(filter).sort(sort).skip(skip);
        if let Ok(limit) = i64::try_from(query.limit) {
            find = find.limit(limit);
        }

        let items = Self::collect(find.await?).await?;
        Ok(Page {
            items,
            total: total as usize,
        })
    }

    async fn replace(&self, record: T) -> Result<Option<T>, StoreError> {
        let doc = Self::record_to_document(&record)?;
        let result = self
            .collection()
            .replace_one(doc! { "_id": record.id().as_str() }, doc)
            .await?;

        if result.matched_count == 0 {
            return Ok(None);
        }
        Ok(Some(record))
    }

    async fn delete(&self, id: &RecordId) -> Result<Option<T>, StoreError> {
        self.collection()
            .find_one_and_delete(doc! { "_id": id.as_str() })
            .await?
            .map(Self::document_to_record)
            .transpose()
    }

    async fn delete_many(&self, ids: &[RecordId]) -> Result<u64, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .collection()
            .delete_many(doc! { "_id": { "$in": id_list(ids) } })
            .await?;
        Ok(result.deleted_count)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = self.collection().delete_many(doc! {}).await?;
        Ok(result.deleted_count)
    }
}
