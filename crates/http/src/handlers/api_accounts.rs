//! REST endpoints for accounts: users and token issue.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stronger_core::User;

use crate::api_error::ApiError;
use crate::api_types::{TokenRequest, TokenResponse, UserCreateRequest, UserUpdateRequest};
use crate::auth::ApiUser;
use crate::handlers::deleted;
use crate::AppState;

pub async fn get_auth_token(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.services.accounts.obtain_auth_token(&req.username, &req.password).await?;
    Ok(Json(TokenResponse { token }))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.services.accounts.list_users().await?))
}

/// Registration is open, so this is the one write that needs no credentials.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UserCreateRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let new_user = req.validate()?;
    let user = state.services.accounts.create_user(new_user).await?;
    tracing::info!(user_id = user.id, "Created user via API");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Path(username): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.services.accounts.get_user_by_username(&username).await?))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    ApiUser(actor): ApiUser,
    Path(username): Path<String>,
    Json(req): Json<UserUpdateRequest>,
) -> Result<Json<User>, ApiError> {
    let accounts = &state.services.accounts;
    let target = accounts.get_user_by_username(&username).await?;
    if target.id != actor.id {
        return Err(ApiError::Forbidden("cannot edit another user".to_owned()));
    }
    if let Some(email) = req.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        accounts.update_email(actor.id, email).await?;
    }
    Ok(Json(accounts.update_settings(actor.id, &req.profile()).await?))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    ApiUser(actor): ApiUser,
    Path(username): Path<String>,
) -> Result<StatusCode, ApiError> {
    let target = state.services.accounts.get_user_by_username(&username).await?;
    deleted(state.services.accounts.delete_user(actor.id, target.id).await?)
}
