use std::result::Result as StdResult;

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors raised while parsing or validating domain values.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid {kind}: '{value}'")]
    InvalidValue { kind: &'static str, value: String },

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
}

impl CoreError {
    pub(crate) fn invalid(kind: &'static str, value: &str) -> Self {
        Self::InvalidValue { kind, value: value.to_owned() }
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

pub type Result<T> = StdResult<T, CoreError>;
