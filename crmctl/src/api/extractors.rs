//! Request extractors shared by the API handlers.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request, rejection::JsonRejection},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use validator::{Validate, ValidationErrors};

use crate::{
    db::models::customers::CustomerField,
    errors::{Error, ErrorCode, FieldErrors},
    types::{CustomerId, parse_customer_id},
};

/// Key used for failures that cannot be pinned to a single field.
pub const BODY_KEY: &str = "body";

/// JSON body that has been decoded and checked against its validation rules.
///
/// Any failure, whether the body is not JSON, has the wrong types or breaks a rule, is
/// reported as [`Error::Validation`] before the handler runs.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(rejection_errors)?;
        value.validate().map_err(validation_errors)?;
        Ok(Self(value))
    }
}

/// The `{id}` path segment of a customer route, checked to be a positive integer.
///
/// Runs before any body extractor, so a bad id is reported ahead of a bad payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerIdPath(pub CustomerId);

impl<S> FromRequestParts<S> for CustomerIdPath
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw)) => raw,
            Err(rejection) => {
                debug!("Rejected customer id path: {}", rejection.body_text());
                String::new()
            }
        };

        parse_customer_id(&raw).map(Self)
    }
}

/// Query string parameters. A query string that does not decode, such as a repeated
/// single-valued key, is a bad request with the usual error body.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(Error::BadRequest {
                message: rejection.body_text(),
                code: ErrorCode::BadRequest,
            }),
        }
    }
}

fn rejection_errors(rejection: JsonRejection) -> Error {
    debug!("Rejected request body: {}", rejection.body_text());

    let mut errors = FieldErrors::new();
    errors.insert(BODY_KEY.to_string(), vec![rejection.body_text()]);
    Error::Validation { errors }
}

/// Re-key validator output by API field name.
fn validation_errors(source: ValidationErrors) -> Error {
    let mut errors = FieldErrors::new();

    for (key, failures) in source.field_errors() {
        let name = CustomerField::from_payload_key(&key)
            .map(|field| field.api_name().to_string())
            .unwrap_or_else(|| key.to_string());

        let messages = failures.iter().map(|failure| {
            failure
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| failure.code.to_string())
        });

        errors.entry(name).or_default().extend(messages);
    }

    Error::Validation { errors }
}
