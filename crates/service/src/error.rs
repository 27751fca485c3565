//! Typed error enum for the service layer.
//!
//! Wraps storage failures and adds the outcomes handlers branch on: bad
//! input, failed validation, missing or wrong credentials.

use stronger_core::ValidationErrors;
use stronger_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, not found, duplicate, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Caller provided a malformed value outside any form field.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// One or more form fields failed validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Missing or wrong credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the record belongs to someone else.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Password hashing or a blocking task failed.
    #[error("internal: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_not_found())
    }

    /// Whether this error represents a duplicate/conflict.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }

    /// Turn a duplicate-key failure into a message on `field`, leaving other
    /// errors untouched.
    #[must_use]
    pub fn duplicate_as_field(self, field: &str, message: &str) -> Self {
        if self.is_duplicate() {
            Self::Validation(ValidationErrors::single(field, message))
        } else {
            self
        }
    }
}

impl From<bcrypt::BcryptError> for ServiceError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Internal(format!("password hashing: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
