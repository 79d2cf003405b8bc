//! Query parameters and pagination utilities

use serde::{Deserialize, Serialize};

use super::error::AdminError;

/// Default sort: newest first
pub const DEFAULT_SORT_FIELD: &str = "createdAt";

/// Query parameters for list endpoints
///
/// # Example
/// ```text
/// GET /roles?page=2&limit=10
/// GET /roles?search=admin
/// GET /modules?sort=name:asc
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListParams {
    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Case-insensitive substring matched against `name`
    pub search: Option<String>,

    /// Sort field and direction
    ///
    /// # Format
    /// - `field:asc` or `field` (ascending)
    /// - `field:desc` (descending)
    pub sort: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
            sort: None,
        }
    }
}

impl ListParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, clamped to 1..=100
    pub fn limit(&self) -> usize {
        self.limit.clamp(1, 100)
    }

    /// Records before the requested page, saturating for absurd page numbers
    pub fn skip(&self) -> usize {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// Resolve into a store query, searching on `search_field`.
    pub fn to_query(&self, search_field: &'static str) -> Result<ListQuery, AdminError> {
        let sort = match self.sort.as_deref() {
            Some(raw) if !raw.trim().is_empty() => SortSpec::parse(raw)?,
            _ => SortSpec::default(),
        };

        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|term| SearchSpec {
                field: search_field,
                term: term.to_string(),
            });

        Ok(ListQuery {
            skip: self.skip(),
            limit: self.limit(),
            search,
            sort,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_i32(self) -> i32 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: DEFAULT_SORT_FIELD.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    /// Parse `field`, `field:asc` or `field:desc`.
    ///
    /// Field names must look like identifiers (dots allowed for nested
    /// fields). `id` is accepted as an alias of the stored `_id`.
    pub fn parse(raw: &str) -> Result<Self, AdminError> {
        let (field, direction) = match raw.split_once(':') {
            Some((field, dir)) => {
                let direction = match dir.trim().to_ascii_lowercase().as_str() {
                    "asc" | "1" => SortDirection::Asc,
                    "desc" | "-1" => SortDirection::Desc,
                    other => {
                        return Err(AdminError::validation(format!(
                            "Invalid sort direction: {}",
                            other
                        )));
                    }
                };
                (field.trim(), direction)
            }
            None => (raw.trim(), SortDirection::Asc),
        };

        let valid = field
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && field
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if !valid {
            return Err(AdminError::validation(format!(
                "Invalid sort field: {}",
                field
            )));
        }

        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpec {
    pub field: &'static str,
    pub term: String,
}

/// A resolved list request handed to repositories
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub skip: usize,
    pub limit: usize,
    pub search: Option<SearchSpec>,
    pub sort: SortSpec,
}

impl ListQuery {
    /// Everything, newest first.
    pub fn all() -> Self {
        Self {
            skip: 0,
            limit: usize::MAX,
            search: None,
            sort: SortSpec::default(),
        }
    }
}

/// One page of records plus the total matching count
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PaginationMeta {
    /// Total number of matching records
    pub total: usize,

    /// Current page number (starts at 1)
    pub page: usize,

    /// Total number of pages
    pub pages: usize,

    /// Number of items per page
    pub limit: usize,
}

impl PaginationMeta {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let limit = limit.max(1);
        Self {
            total,
            page,
            pages: total.div_ceil(limit),
            limit,
        }
    }

    pub fn from_params(params: &ListParams, total: usize) -> Self {
        Self::new(params.page(), params.limit(), total)
    }
}
