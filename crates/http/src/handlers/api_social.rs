//! REST endpoints for follow edges, groups and group memberships.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stronger_core::{Friend, Group, GroupInput, GroupMember};

use crate::api_error::ApiError;
use crate::api_types::{FriendRequest, GroupMemberRequest, GroupMemberUpdate};
use crate::auth::ApiUser;
use crate::handlers::deleted;
use crate::query_types::ListQuery;
use crate::AppState;

pub async fn list_friends(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Friend>>, ApiError> {
    Ok(Json(state.services.social.list_friends(query.user).await?))
}

pub async fn create_friend(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Json(req): Json<FriendRequest>,
) -> Result<(StatusCode, Json<Friend>), ApiError> {
    let edge = state.services.social.follow(user.id, req.friend).await?;
    Ok((StatusCode::CREATED, Json(edge)))
}

pub async fn get_friend(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<Friend>, ApiError> {
    Ok(Json(state.services.social.get_friend(id).await?))
}

pub async fn delete_friend(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted(state.services.social.delete_friend(user.id, id).await?)
}

pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
) -> Result<Json<Vec<Group>>, ApiError> {
    Ok(Json(state.services.social.list_groups().await?))
}

pub async fn create_group(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Json(input): Json<GroupInput>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let group = state.services.social.create_group(user.id, &input).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn get_group(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Path(name): Path<String>,
) -> Result<Json<Group>, ApiError> {
    Ok(Json(state.services.social.get_group(&name).await?))
}

pub async fn update_group(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Path(name): Path<String>,
    Json(input): Json<GroupInput>,
) -> Result<Json<Group>, ApiError> {
    Ok(Json(state.services.social.edit_group(user.id, &name, &input).await?))
}

pub async fn delete_group(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    deleted(state.services.social.delete_group(user.id, &name).await?)
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<GroupMember>>, ApiError> {
    Ok(Json(state.services.social.list_members(query.user).await?))
}

/// Join a group as the caller. Memberships made here are approved and never
/// carry admin rights.
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Json(req): Json<GroupMemberRequest>,
) -> Result<(StatusCode, Json<GroupMember>), ApiError> {
    let member = state.services.social.join_group(user.id, &req.group).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn get_member(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<GroupMember>, ApiError> {
    Ok(Json(state.services.social.get_member(id).await?))
}

pub async fn update_member(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Path(id): Path<i64>,
    Json(req): Json<GroupMemberUpdate>,
) -> Result<Json<GroupMember>, ApiError> {
    Ok(Json(state.services.social.update_member(user.id, id, req.approved, req.admin).await?))
}

pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted(state.services.social.delete_member(user.id, id).await?)
}
