//! Record identifiers
//!
//! Every record is keyed by an ObjectId-shaped value: 24 hexadecimal
//! characters. IDs travel as plain strings on the wire and in storage, and a
//! `RecordId` can only be built from a well-formed value.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::AdminError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(ObjectId::new().to_hex())
    }

    /// Parse an identifier, normalizing hex digits to lower case.
    pub fn parse(value: &str) -> Option<Self> {
        ObjectId::parse_str(value).ok().map(|oid| Self(oid.to_hex()))
    }

    /// Parse a path parameter, reporting which entity the ID was meant for.
    pub fn parse_path(value: &str, entity: &'static str) -> Result<Self, AdminError> {
        Self::parse(value).ok_or_else(|| AdminError::InvalidId {
            entity,
            id: value.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecordId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid record id: {}", value))
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
