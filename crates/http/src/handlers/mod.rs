#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod accounts;
pub mod api_accounts;
pub mod api_nutrition;
pub mod api_social;
pub mod api_training;
pub mod exercises;
pub mod groups;
pub mod nutrition;
pub mod users;
pub mod workouts;

use axum::http::StatusCode;

use crate::api_error::ApiError;

/// `204 No Content` when a row was removed, `404` when there was none.
pub(crate) fn deleted(found: bool) -> Result<StatusCode, ApiError> {
    if found {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("not found".to_owned()))
    }
}
