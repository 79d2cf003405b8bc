//! Typed error handling for the admin backend
//!
//! Every handler returns `Result<_, AdminError>`. The error knows its HTTP
//! status and machine-readable code, and renders the standard failure
//! envelope:
//!
//! ```json
//! { "success": false, "message": "Role not found", "code": "NOT_FOUND" }
//! ```
//!
//! # Error Categories
//!
//! - validation (malformed body, malformed ID, unknown action) → 400
//! - not found (target or referenced record absent) → 404
//! - conflict (duplicate unique field) → 409
//! - infrastructure (store failure, unexpected state) → 500
//!
//! Infrastructure details are withheld from response bodies. The full
//! envelope rides along as an [`InternalErrorDetail`] response extension so
//! a server configured for development can put it back.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type returned by request handlers.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Body or query failed shape validation
    #[error("{0}")]
    Validation(String),

    /// A path ID is not ObjectId-shaped
    #[error("Invalid {entity} ID: {id}")]
    InvalidId { entity: &'static str, id: String },

    /// A foreign-key value is not ObjectId-shaped
    #[error("Invalid {field} ID: {id}")]
    InvalidReference { field: &'static str, id: String },

    /// The targeted record does not exist
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// Well-formed foreign keys that point nowhere
    #[error("{field} not found with ID(s): {}", ids.join(", "))]
    MissingReferences { field: &'static str, ids: Vec<String> },

    /// Unique field already taken
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AdminError {
    pub fn validation(message: impl Into<String>) -> Self {
        AdminError::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AdminError::Conflict(message.into())
    }

    pub fn not_found(entity: &'static str) -> Self {
        AdminError::NotFound { entity }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AdminError::Validation(_)
            | AdminError::InvalidId { .. }
            | AdminError::InvalidReference { .. } => StatusCode::BAD_REQUEST,
            AdminError::NotFound { .. } | AdminError::MissingReferences { .. } => {
                StatusCode::NOT_FOUND
            }
            AdminError::Conflict(_) => StatusCode::CONFLICT,
            AdminError::Store(StoreError::Duplicate { .. }) => StatusCode::CONFLICT,
            AdminError::Store(_) | AdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AdminError::Validation(_) => "VALIDATION_ERROR",
            AdminError::InvalidId { .. } => "INVALID_ID",
            AdminError::InvalidReference { .. } => "INVALID_REFERENCE",
            AdminError::NotFound { .. } => "NOT_FOUND",
            AdminError::MissingReferences { .. } => "MISSING_REFERENCES",
            AdminError::Conflict(_) | AdminError::Store(StoreError::Duplicate { .. }) => {
                "CONFLICT"
            }
            AdminError::Store(_) => "STORAGE_ERROR",
            AdminError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AdminError::InvalidReference { field, id } => {
                Some(serde_json::json!({ "field": field, "id": id }))
            }
            AdminError::MissingReferences { field, ids } => {
                Some(serde_json::json!({ "field": field, "missingIds": ids }))
            }
            _ => None,
        }
    }

    /// Full failure envelope, infrastructure detail included
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            success: false,
            message: self.to_string(),
            code: self.error_code(),
            details: self.details(),
        }
    }

    /// Envelope sent to clients: server errors get a generic message
    pub fn public_response(&self) -> ErrorResponse {
        let mut body = self.to_response();
        if self.status_code().is_server_error() {
            body.message = "Internal server error".to_string();
        }
        body
    }
}

/// Unmasked envelope attached to 5xx responses
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub ErrorResponse);

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self.public_response())).into_response();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            response
                .extensions_mut()
                .insert(InternalErrorDetail(self.to_response()));
        }
        response
    }
}

impl From<validator::ValidationErrors> for AdminError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for '{}'", field),
                })
            })
            .collect();
        messages.sort();
        AdminError::Validation(messages.join("; "))
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by repository implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write
    #[error("A record with this {field} already exists")]
    Duplicate { field: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        let duplicate = match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == 11000,
            ErrorKind::Command(e) => e.code == 11000,
            _ => false,
        };

        if duplicate {
            StoreError::Duplicate {
                field: duplicate_field(&err.to_string()),
            }
        } else {
            StoreError::Backend(err.to_string())
        }
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Pull the offending key out of an E11000 message
/// (`... dup key: { email: "a@b.c" }`), falling back to "value".
fn duplicate_field(message: &str) -> String {
    message
        .split("dup key: {")
        .nth(1)
        .and_then(|rest| rest.split(':').next())
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty())
        .unwrap_or_else(|| "value".to_string())
}

// =============================================================================
// Configuration Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to read config file {path}: {message}")]
    File { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AdminError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AdminError::InvalidId {
                entity: "role",
                id: "x".into()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AdminError::not_found("Role").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AdminError::MissingReferences {
                field: "screen",
                ids: vec![]
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AdminError::conflict("dup").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AdminError::Store(StoreError::Duplicate {
                field: "name".into()
            })
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AdminError::Store(StoreError::Backend("down".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_references_message_lists_ids() {
        let err = AdminError::MissingReferences {
            field: "screen",
            ids: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "screen not found with ID(s): a, b");
        let body = err.to_response();
        assert_eq!(body.details.unwrap()["missingIds"][1], "b");
    }

    #[test]
    fn test_internal_message_hidden_from_clients() {
        let err = AdminError::Store(StoreError::Backend("connection refused".into()));
        let body = err.public_response();
        assert!(!body.success);
        assert_eq!(body.message, "Internal server error");
        assert_eq!(body.code, "STORAGE_ERROR");
        assert_eq!(err.to_response().message, "Database error: connection refused");
    }

    #[test]
    fn test_server_error_response_carries_detail_extension() {
        let response = AdminError::Internal("boom".into()).into_response();
        let detail = response.extensions().get::<InternalErrorDetail>().unwrap();
        assert_eq!(detail.0.message, "Internal error: boom");

        let response = AdminError::not_found("Role").into_response();
        assert!(response.extensions().get::<InternalErrorDetail>().is_none());
    }

    #[test]
    fn test_duplicate_field_parsing() {
        let msg = r#"E11000 duplicate key error collection: db.tenants index: email_1 dup key: { email: "a@b.c" }"#;
        assert_eq!(duplicate_field(msg), "email");
        assert_eq!(duplicate_field("no details"), "value");
    }
}
