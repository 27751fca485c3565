//! Error type for HTML page handlers.
//!
//! Mirrors `ApiError` but renders a small HTML page instead of JSON.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use stronger_core::ValidationErrors;
use stronger_service::ServiceError;

use crate::views::layout::{error_list, page};

#[derive(Debug)]
pub enum PageError {
    BadRequest(ValidationErrors),
    Forbidden(String),
    NotFound,
    Internal(anyhow::Error),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, title, body) = match self {
            Self::BadRequest(errors) => {
                (StatusCode::BAD_REQUEST, "Bad request", error_list(&errors))
            },
            Self::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                "Forbidden",
                format!("<p>{}</p>", crate::views::layout::esc(&msg)),
            ),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                "Page not found",
                "<p>The page you requested does not exist.</p>".to_owned(),
            ),
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error",
                    "<p>Something went wrong.</p>".to_owned(),
                )
            },
        };
        (status, page(title, None, &body)).into_response()
    }
}

impl From<ServiceError> for PageError {
    fn from(err: ServiceError) -> Self {
        if err.is_not_found() {
            return Self::NotFound;
        }
        match err {
            ServiceError::Validation(errors) => Self::BadRequest(errors),
            ServiceError::InvalidInput(msg) => Self::BadRequest(ValidationErrors::single("input", msg)),
            ServiceError::Forbidden(msg) | ServiceError::Unauthorized(msg) => Self::Forbidden(msg),
            ServiceError::Storage(_) | ServiceError::Internal(_) => Self::Internal(err.into()),
        }
    }
}

pub type PageResult<T = Response> = Result<T, PageError>;
