//! REST endpoints for nutrition records and bodyweight.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stronger_core::{BodyWeight, BodyWeightInput, DailyNutrition, NutritionInput};

use crate::api_error::ApiError;
use crate::auth::ApiUser;
use crate::handlers::deleted;
use crate::query_types::ListQuery;
use crate::AppState;

pub async fn list_nutrition(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<DailyNutrition>>, ApiError> {
    Ok(Json(state.services.nutrition.list_nutrition(query.user, query.capped_limit()).await?))
}

pub async fn create_nutrition(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Json(input): Json<NutritionInput>,
) -> Result<(StatusCode, Json<DailyNutrition>), ApiError> {
    let record = state.services.nutrition.record_nutrition(user.id, &input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_nutrition(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<DailyNutrition>, ApiError> {
    Ok(Json(state.services.nutrition.get_nutrition(id).await?))
}

pub async fn update_nutrition(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Path(id): Path<i64>,
    Json(input): Json<NutritionInput>,
) -> Result<Json<DailyNutrition>, ApiError> {
    Ok(Json(state.services.nutrition.edit_nutrition(user.id, id, &input).await?))
}

pub async fn delete_nutrition(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted(state.services.nutrition.delete_nutrition(user.id, id).await?)
}

pub async fn list_bodyweights(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<BodyWeight>>, ApiError> {
    Ok(Json(state.services.nutrition.list_bodyweights(query.user, query.capped_limit()).await?))
}

pub async fn create_bodyweight(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Json(input): Json<BodyWeightInput>,
) -> Result<(StatusCode, Json<BodyWeight>), ApiError> {
    let record = state.services.nutrition.record_bodyweight(user.id, &input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_bodyweight(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<BodyWeight>, ApiError> {
    Ok(Json(state.services.nutrition.get_bodyweight(id).await?))
}

pub async fn update_bodyweight(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Path(id): Path<i64>,
    Json(input): Json<BodyWeightInput>,
) -> Result<Json<BodyWeight>, ApiError> {
    Ok(Json(state.services.nutrition.edit_bodyweight(user.id, id, &input).await?))
}

pub async fn delete_bodyweight(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted(state.services.nutrition.delete_bodyweight(user.id, id).await?)
}
