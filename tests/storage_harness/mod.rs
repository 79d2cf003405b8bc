//! Shared test harness for repository backends
//!
//! Provides `Gadget`, a record with one case-insensitive and one exact
//! unique field, plus helpers for building fixtures.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod repository_tests;

use chrono::{DateTime, TimeZone, Utc};
use saas_admin::core::record::{NameMatch, Record, UniqueField};
use saas_admin::core::RecordId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gadget {
    pub id: RecordId,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub parts: Vec<RecordId>,
    #[serde(with = "saas_admin::core::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Record for Gadget {
    const COLLECTION: &'static str = "gadgets";
    const LABEL: &'static str = "Gadget";

    fn unique_fields() -> &'static [UniqueField] {
        &[
            UniqueField {
                field: "name",
                matching: NameMatch::CaseInsensitive,
            },
            UniqueField {
                field: "code",
                matching: NameMatch::Exact,
            },
        ]
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Millisecond-precision instant `offset_secs` after a fixed epoch, so
/// values survive a storage round-trip unchanged.
pub fn at(offset_secs: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_000 + offset_secs * 1000)
        .single()
        .unwrap()
}

pub fn gadget(name: &str, code: &str, offset_secs: i64) -> Gadget {
    Gadget {
        id: RecordId::generate(),
        name: name.to_string(),
        code: code.to_string(),
        parts: Vec::new(),
        created_at: at(offset_secs),
    }
}
