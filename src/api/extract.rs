//! JSON body extraction that reports bad input per field.
//!
//! Axum's own `Json` rejects a body that does not match the target type with a plain-text
//! response. [`ValidJson`] deserializes the body itself and turns the failure into the
//! same `field → messages` map the business rules produce.

use crate::{
    api::error::ApiError,
    core::validation,
    errors::{Error, FieldErrors},
};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_path_to_error::Segment;

/// Field key for failures that concern the body as a whole.
const BODY_FIELD: &str = "body";

/// A JSON request body, deserialized with per-field error reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            let mut errors = FieldErrors::new();
            errors.add(BODY_FIELD, rejection.body_text());
            Error::Validation { errors }
        })?;

        parse_body(&bytes)
            .map(ValidJson)
            .map_err(|errors| Error::Validation { errors }.into())
    }
}

/// Deserializes `bytes` into `T`, keying any failure by the path of the offending field.
pub fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FieldErrors> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(describe)?;
    deserializer.end().map_err(|_| malformed_body())?;
    Ok(value)
}

fn malformed_body() -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.add(BODY_FIELD, "The request body must be valid JSON.");
    errors
}

fn describe(err: serde_path_to_error::Error<serde_json::Error>) -> FieldErrors {
    let mut field: Vec<String> = err.path().iter().filter_map(segment_key).collect();
    let inner = err.into_inner();
    if inner.is_syntax() || inner.is_eof() {
        return malformed_body();
    }

    let mut errors = FieldErrors::new();
    let detail = inner.to_string();
    let detail = strip_location(&detail);
    if let Some(missing) = backticked(detail, "missing field `") {
        field.push(missing.to_string());
        let key = field.join(".");
        errors.add(key.clone(), format!("The {key} field is required."));
        return errors;
    }

    let key = if field.is_empty() {
        BODY_FIELD.to_string()
    } else {
        field.join(".")
    };
    let message = if detail.starts_with("unknown variant") {
        validation::missing_reference(&key)
    } else if let Some(rule) = detail.strip_prefix("must ") {
        format!("The {key} field must {rule}.")
    } else {
        format!("The {key} field is invalid.")
    };
    errors.add(key, message);
    errors
}

fn segment_key(segment: &Segment) -> Option<String> {
    match segment {
        Segment::Seq { index } => Some(index.to_string()),
        Segment::Map { key } => Some(key.clone()),
        Segment::Enum { variant } => Some(variant.clone()),
        Segment::Unknown => None,
    }
}

/// Drops serde_json's trailing ` at line L column C`.
fn strip_location(message: &str) -> &str {
    message
        .rsplit_once(" at line ")
        .map_or(message, |(detail, _)| detail)
}

fn backticked<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    message
        .strip_prefix(prefix)?
        .split_once('`')
        .map(|(name, _)| name)
}
