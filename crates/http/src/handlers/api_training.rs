//! REST endpoints for workouts, exercises and goals.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use stronger_core::{Exercise, Goal, GoalInput, WorkoutWithSets};

use crate::api_error::ApiError;
use crate::api_types::{ExerciseRequest, WorkoutRequest};
use crate::auth::ApiUser;
use crate::handlers::deleted;
use crate::query_types::ListQuery;
use crate::AppState;

pub async fn list_workouts(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<WorkoutWithSets>>, ApiError> {
    let workouts = state.services.workouts.list_workouts_with_sets(query.user, query.capped_limit()).await?;
    Ok(Json(workouts))
}

pub async fn create_workout(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Json(req): Json<WorkoutRequest>,
) -> Result<(StatusCode, Json<WorkoutWithSets>), ApiError> {
    let workout = state.services.workouts.record_workout(user.id, &req.workout, &req.sets).await?;
    tracing::info!(user_id = user.id, workout_id = workout.workout.id, sets = workout.sets.len(), "Recorded workout via API");
    Ok((StatusCode::CREATED, Json(workout)))
}

pub async fn get_workout(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<WorkoutWithSets>, ApiError> {
    Ok(Json(state.services.workouts.workout_with_sets(id).await?))
}

/// Replace the workout header. Sets are recorded once and not rewritten here.
pub async fn update_workout(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Path(id): Path<i64>,
    Json(req): Json<WorkoutRequest>,
) -> Result<Json<WorkoutWithSets>, ApiError> {
    let workouts = &state.services.workouts;
    workouts.edit_workout(user.id, id, &req.workout).await?;
    Ok(Json(workouts.workout_with_sets(id).await?))
}

pub async fn delete_workout(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted(state.services.workouts.delete_workout(user.id, id).await?)
}

pub async fn list_exercises(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
) -> Result<Json<Vec<Exercise>>, ApiError> {
    Ok(Json(state.services.exercises.list_exercises().await?))
}

pub async fn create_exercise(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Json(req): Json<ExerciseRequest>,
) -> Result<(StatusCode, Json<Exercise>), ApiError> {
    let input = req.validate()?;
    let exercise = state.services.exercises.add_exercise(user.id, &input).await?;
    Ok((StatusCode::CREATED, Json(exercise)))
}

pub async fn get_exercise(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Path(clean_name): Path<String>,
) -> Result<Json<Exercise>, ApiError> {
    Ok(Json(state.services.exercises.get_exercise(&clean_name).await?))
}

pub async fn update_exercise(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Path(clean_name): Path<String>,
    Json(req): Json<ExerciseRequest>,
) -> Result<Json<Exercise>, ApiError> {
    let input = req.validate()?;
    Ok(Json(state.services.exercises.edit_exercise(&clean_name, &input).await?))
}

pub async fn delete_exercise(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Path(clean_name): Path<String>,
) -> Result<StatusCode, ApiError> {
    deleted(state.services.exercises.delete_exercise(user.id, &clean_name).await?)
}

pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Goal>>, ApiError> {
    Ok(Json(state.services.exercises.list_goals(query.user).await?))
}

pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Json(input): Json<GoalInput>,
) -> Result<(StatusCode, Json<Goal>), ApiError> {
    let goal = state.services.exercises.create_goal(user.id, &input).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    ApiUser(_): ApiUser,
    Path(id): Path<i64>,
) -> Result<Json<Goal>, ApiError> {
    Ok(Json(state.services.exercises.get_goal(id).await?))
}

pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Path(id): Path<i64>,
    Json(input): Json<GoalInput>,
) -> Result<Json<Goal>, ApiError> {
    Ok(Json(state.services.exercises.update_goal(user.id, id, &input).await?))
}

pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    deleted(state.services.exercises.delete_goal(user.id, id).await?)
}
