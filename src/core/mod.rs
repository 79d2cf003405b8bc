//! Core module containing fundamental traits and types for the backend

pub mod error;
pub mod extract;
pub mod id;
pub mod password;
pub mod query;
pub mod record;
pub mod references;
pub mod response;
pub mod service;
pub mod timestamp;

pub use error::{AdminError, ConfigError, StoreError};
pub use extract::{JsonBody, QueryParams};
pub use id::RecordId;
pub use query::{ListParams, ListQuery, Page, PaginationMeta, SortDirection, SortSpec};
pub use record::{NameMatch, Record, UniqueField};
pub use references::{
    ensure_exist, expand_ordered, lookup_map, parse_references, pick_ordered, validate_references,
};
pub use response::ApiResponse;
pub use service::Repository;
