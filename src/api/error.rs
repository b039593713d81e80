//! Mapping from crate errors to HTTP responses.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Result type returned by every handler.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// A crate [`Error`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::Validation { errors } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": "validation_error",
                    "message": "The given data was invalid.",
                    "errors": errors,
                })),
            )
                .into_response(),
            Error::NotFound { entity, id } => json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{entity} {id} not found"),
            ),
            err @ Error::InUse { .. } => {
                json_error(StatusCode::CONFLICT, "in_use", err.to_string())
            }
            Error::Unauthorized => json_error(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "missing or unknown user",
            ),
            Error::Forbidden { message } => json_error(StatusCode::FORBIDDEN, "forbidden", message),
            // Internals stay in the log
            other => {
                error!("Request failed: {}", other);
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error",
                )
            }
        }
    }
}

/// Builds a `{ "error": code, "message": message }` response.
pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FieldErrors;

    #[test]
    fn test_status_mapping() {
        let mut errors = FieldErrors::new();
        errors.add("name", "The name field is required.");
        let cases = [
            (Error::Validation { errors }, StatusCode::UNPROCESSABLE_ENTITY),
            (
                Error::NotFound {
                    entity: "product",
                    id: 3,
                },
                StatusCode::NOT_FOUND,
            ),
            (
                Error::InUse {
                    entity: "category",
                    id: 1,
                    dependents: "products",
                },
                StatusCode::CONFLICT,
            ),
            (Error::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                Error::Forbidden {
                    message: "no".to_string(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                Error::Database(sea_orm::DbErr::Custom("boom".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError(err).into_response().status(), status);
        }
    }
}
