//! Typed API error for JSON handlers.
//!
//! Converts service errors into HTTP responses with a JSON body and status
//! code. Handlers return `Result<Json<T>, ApiError>` instead of losing error
//! context with a bare `StatusCode`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use stronger_core::ValidationErrors;
use stronger_service::ServiceError;
use stronger_storage::StorageError;

/// API error with HTTP status code and human-readable message.
///
/// Converts to `{"error": "message"}`; validation failures also carry a
/// `fields` list. `Internal` logs the real error server-side and returns a
/// static message to the client.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: malformed input outside any form field.
    BadRequest(String),
    /// 400 Bad Request: one or more fields failed validation.
    Validation(ValidationErrors),
    /// 401 Unauthorized: no valid session cookie or token.
    Unauthorized(String),
    /// 403 Forbidden: the record belongs to someone else.
    Forbidden(String),
    /// 404 Not Found: requested resource doesn't exist.
    NotFound(String),
    /// 422 Unprocessable Entity: valid syntax but semantic rejection.
    UnprocessableEntity(String),
    /// 500 Internal Server Error. Details logged, not exposed.
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, serde_json::json!({"error": msg})),
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({"error": errors.to_string(), "fields": errors}),
            ),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, serde_json::json!({"error": msg})),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, serde_json::json!({"error": msg})),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, serde_json::json!({"error": msg})),
            Self::UnprocessableEntity(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, serde_json::json!({"error": msg}))
            },
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({"error": "internal server error"}),
                )
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(ref e) if e.is_duplicate() => {
                Self::UnprocessableEntity(err.to_string())
            },
            ServiceError::Storage(StorageError::NotFound { entity, id }) => {
                Self::NotFound(format!("{entity} '{id}' not found"))
            },
            ServiceError::Storage(StorageError::InvalidReference(msg) | StorageError::Constraint(msg)) => {
                Self::UnprocessableEntity(msg)
            },
            ServiceError::InvalidInput(msg) => Self::BadRequest(msg),
            ServiceError::Validation(errors) => Self::Validation(errors),
            ServiceError::Unauthorized(msg) => Self::Unauthorized(msg),
            ServiceError::Forbidden(msg) => Self::Forbidden(msg),
            ServiceError::Storage(_) | ServiceError::Internal(_) => Self::Internal(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::Storage(StorageError::not_found("workout", 3)), StatusCode::NOT_FOUND),
            (ServiceError::Storage(StorageError::Duplicate("x".into())), StatusCode::UNPROCESSABLE_ENTITY),
            (ServiceError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (ServiceError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::Validation(ValidationErrors::single("date", "bad")), StatusCode::BAD_REQUEST),
            (ServiceError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
