use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use chrono::Local;
use stronger_core::analytics::WorkoutCharts;
use stronger_core::constants::{DEFAULT_WORKOUT_DAYS_BACK, HISTORY_ROWS, MAX_DAYS_BACK, MOST_FREQUENT_USERS};
use stronger_core::{SetInput, User, ValidationErrors, WorkoutInput};
use stronger_service::{ServiceError, WorkoutsSummary, parse_days_back};

use crate::api_error::ApiError;
use crate::auth::{ApiUser, PageUser};
use crate::forms::FormFields;
use crate::page_error::{PageError, PageResult};
use crate::query_types::{DaysBackQuery, NameQuery};
use crate::views::layout::page;
use crate::views::workouts::{self, WorkoutPage, WorkoutValues};
use crate::AppState;

const RECENT_BY_OWNER: usize = 5;

pub async fn workouts(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Query(query): Query<NameQuery>,
) -> PageResult<Response> {
    if let Some(id) = query.name.as_deref().and_then(|n| n.trim().parse::<i64>().ok()) {
        let workout = state.services.workouts.get_workout(id).await?;
        return Ok(Redirect::to(&workout.path()).into_response());
    }
    let service = &state.services.workouts;
    let leaders = service.most_frequent_users(MOST_FREQUENT_USERS).await?;
    let history = service.list_workouts(Some(user.id), HISTORY_ROWS).await?;
    let friends = service.friend_workouts(user.id, HISTORY_ROWS).await?;
    Ok(page("Workouts", Some(&user), &workouts::workouts(&leaders, &history, &friends)).into_response())
}

async fn render_workout(
    state: &AppState,
    viewer: &User,
    id: i64,
    submitted: Option<(&FormFields, &ValidationErrors)>,
) -> PageResult<Html<String>> {
    let workout = state.services.workouts.workout_with_sets(id).await?;
    let owner = state.services.accounts.get_user(workout.workout.user_id).await?;
    let recent = state.services.workouts.list_workouts(Some(owner.id), RECENT_BY_OWNER).await?;
    let no_errors = ValidationErrors::new();
    let (edit_values, errors) = match submitted {
        Some((form, errors)) => (
            WorkoutValues {
                date: form.get("date").to_owned(),
                description: form.get("description"),
                comments: form.get("comments"),
            },
            errors,
        ),
        None => (WorkoutValues::from_workout(&workout.workout), &no_errors),
    };
    let data = WorkoutPage {
        workout: &workout,
        owner: &owner,
        recent: &recent,
        editable: viewer.id == owner.id,
        edit_values,
        errors,
    };
    let title = format!("Workout on {}", workout.workout.date);
    Ok(page(&title, Some(viewer), &workouts::workout(&data)))
}

pub async fn workout(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Path(id): Path<i64>,
) -> PageResult<Html<String>> {
    render_workout(&state, &user, id, None).await
}

pub async fn edit_workout(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Path(id): Path<i64>,
    Form(form): Form<FormFields>,
) -> PageResult<Html<String>> {
    let result = match WorkoutInput::from_fields(form.get("date"), form.get("description"), form.get("comments")) {
        Ok(input) => state.services.workouts.edit_workout(user.id, id, &input).await.map(|_| ()),
        Err(errors) => Err(ServiceError::Validation(errors)),
    };
    match result {
        Ok(()) => render_workout(&state, &user, id, None).await,
        Err(ServiceError::Validation(errors)) => render_workout(&state, &user, id, Some((&form, &errors))).await,
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_workout(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Path(id): Path<i64>,
) -> PageResult<Redirect> {
    state.services.workouts.delete_workout(user.id, id).await?;
    tracing::info!(user_id = user.id, workout_id = id, "Deleted workout");
    Ok(Redirect::to("/workouts"))
}

pub async fn record_workout_page(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
) -> PageResult<Html<String>> {
    let exercises = state.services.exercises.list_exercises().await?;
    let values = WorkoutValues { date: Local::now().date_naive().to_string(), description: "", comments: "" };
    let body = workouts::record_workout(&exercises, &values, |_| "", &ValidationErrors::new());
    Ok(page("Record workout", Some(&user), &body))
}

pub async fn record_workout(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Form(form): Form<FormFields>,
) -> PageResult<Response> {
    let meta = WorkoutInput::from_fields(form.get("date"), form.get("description"), form.get("comments"));
    let sets = SetInput::parse_formset(form.pairs());
    let result = match (meta, sets) {
        (Ok(input), Ok(sets)) => state.services.workouts.record_workout(user.id, &input, &sets).await,
        (meta, sets) => {
            let mut errors = ValidationErrors::new();
            if let Err(e) = meta {
                errors.extend(e);
            }
            if let Err(e) = sets {
                errors.extend(e);
            }
            Err(ServiceError::Validation(errors))
        },
    };
    match result {
        Ok(saved) => {
            tracing::info!(user_id = user.id, workout_id = saved.workout.id, sets = saved.sets.len(), "Recorded workout");
            Ok(Redirect::to(&saved.workout.path()).into_response())
        },
        Err(ServiceError::Validation(errors)) => {
            let exercises = state.services.exercises.list_exercises().await?;
            let values = WorkoutValues {
                date: form.get("date").to_owned(),
                description: form.get("description"),
                comments: form.get("comments"),
            };
            let body = workouts::record_workout(&exercises, &values, |k| form.get(k), &errors);
            Ok(page("Record workout", Some(&user), &body).into_response())
        },
        Err(e) => Err(PageError::from(e)),
    }
}

pub async fn workout_chart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<WorkoutCharts>, ApiError> {
    Ok(Json(state.services.workouts.workout_charts(id).await?))
}

pub async fn workouts_summary(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Query(query): Query<DaysBackQuery>,
) -> Result<Json<WorkoutsSummary>, ApiError> {
    let days_back = parse_days_back(query.days_back.as_deref(), DEFAULT_WORKOUT_DAYS_BACK, MAX_DAYS_BACK)?;
    let today = Local::now().date_naive();
    Ok(Json(state.services.workouts.workouts_summary(user.id, days_back, today).await?))
}
