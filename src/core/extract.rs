//! Request extractors that fail with the standard error envelope

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::error::AdminError;

/// JSON body extractor mapping every rejection to a 400 `AdminError`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AdminError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AdminError {
    match rejection {
        JsonRejection::JsonDataError(e) => AdminError::validation(e.body_text()),
        JsonRejection::JsonSyntaxError(_) => AdminError::validation("Malformed JSON body"),
        JsonRejection::MissingJsonContentType(_) => {
            AdminError::validation("Expected Content-Type: application/json")
        }
        other => AdminError::validation(other.body_text()),
    }
}

/// Query-string extractor mapping rejections to a 400 `AdminError`
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AdminError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        axum::extract::Query::<T>::from_request_parts(parts, state)
            .await
            .map(|axum::extract::Query(value)| QueryParams(value))
            .map_err(|rejection: QueryRejection| AdminError::validation(rejection.body_text()))
    }
}
