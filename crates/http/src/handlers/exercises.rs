use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use chrono::NaiveDate;
use stronger_core::constants::POPULAR_EXERCISES;
use stronger_core::{ExerciseInput, User, ValidationErrors};
use stronger_service::{ExerciseHistory, ServiceError};
use stronger_storage::ExerciseCount;

use crate::api_error::ApiError;
use crate::auth::{MaybeUser, PageUser};
use crate::forms::FormFields;
use crate::page_error::PageResult;
use crate::query_types::{NameQuery, RepsQuery};
use crate::views::exercises::{self, ExercisePage, ExerciseValues, ExercisesPage};
use crate::views::layout::page;
use crate::AppState;

const RECENTLY_ADDED: usize = 4;

fn parse_exercise(form: &FormFields) -> Result<ExerciseInput, ServiceError> {
    ExerciseInput::from_fields(form.get("name"), form.get("primary"), form.get("secondary"))
        .map_err(ServiceError::Validation)
}

async fn render_exercises(
    state: &AppState,
    user: &User,
    add_values: ExerciseValues<'_>,
    errors: &ValidationErrors,
) -> PageResult<Html<String>> {
    let service = &state.services.exercises;
    let categorised = service.categorise_exercises().await?;
    let count = service.count_exercises().await?;
    let recent = service.recently_added(RECENTLY_ADDED).await?;
    let biggest_totals = service.biggest_totals(None).await?;
    let friend_totals = service.friend_totals(user.id).await?;
    let data = ExercisesPage {
        categorised: &categorised,
        count,
        recent: &recent,
        biggest_totals: &biggest_totals,
        friend_totals: &friend_totals,
        add_values,
        errors,
    };
    Ok(page("Exercises", Some(user), &exercises::exercises(&data)))
}

pub async fn exercises(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Query(query): Query<NameQuery>,
) -> PageResult<Response> {
    if let Some(name) = query.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        let exercise = state.services.exercises.get_exercise_by_name(name).await?;
        return Ok(Redirect::to(&exercise.path()).into_response());
    }
    Ok(render_exercises(&state, &user, ExerciseValues::EMPTY, &ValidationErrors::new()).await?.into_response())
}

pub async fn add_exercise(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Form(form): Form<FormFields>,
) -> PageResult<Response> {
    let result = match parse_exercise(&form) {
        Ok(input) => state.services.exercises.add_exercise(user.id, &input).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(exercise) => {
            tracing::info!(user_id = user.id, exercise = %exercise.name, "Added exercise");
            Ok(Redirect::to(&exercise.path()).into_response())
        },
        Err(ServiceError::Validation(errors)) => {
            let values = ExerciseValues {
                name: form.get("name"),
                primary: form.get("primary"),
                secondary: form.get("secondary"),
            };
            Ok(render_exercises(&state, &user, values, &errors).await?.into_response())
        },
        Err(e) => Err(e.into()),
    }
}

async fn render_exercise(
    state: &AppState,
    user: &User,
    clean_name: &str,
    submitted: Option<(&FormFields, &ValidationErrors)>,
) -> PageResult<Html<String>> {
    let exercise = state.services.exercises.get_exercise(clean_name).await?;
    let total_reps = state.services.exercises.sum_reps(clean_name, user.id, None).await?;
    let workouts = state.services.workouts.workouts_including_exercise(clean_name, Some(user.id)).await?;
    let no_errors = ValidationErrors::new();
    let (edit_values, errors) = match submitted {
        Some((form, errors)) => (
            ExerciseValues { name: form.get("name"), primary: form.get("primary"), secondary: form.get("secondary") },
            errors,
        ),
        None => (ExerciseValues::from_exercise(&exercise), &no_errors),
    };
    let data = ExercisePage { exercise: &exercise, total_reps, workouts: &workouts, edit_values, errors };
    Ok(page(&exercise.name, Some(user), &exercises::exercise(&data)))
}

pub async fn exercise(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Path(clean_name): Path<String>,
) -> PageResult<Html<String>> {
    render_exercise(&state, &user, &clean_name, None).await
}

pub async fn edit_exercise(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Path(clean_name): Path<String>,
    Form(form): Form<FormFields>,
) -> PageResult<Response> {
    let result = match parse_exercise(&form) {
        Ok(input) => state.services.exercises.edit_exercise(&clean_name, &input).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(exercise) => Ok(Redirect::to(&exercise.path()).into_response()),
        Err(ServiceError::Validation(errors)) => {
            Ok(render_exercise(&state, &user, &clean_name, Some((&form, &errors))).await?.into_response())
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn exercise_history(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Path(clean_name): Path<String>,
    Query(query): Query<RepsQuery>,
) -> Result<Json<ExerciseHistory>, ApiError> {
    let user_id = user.map(|u| u.id);
    Ok(Json(state.services.exercises.exercise_history(&clean_name, user_id, query.reps).await?))
}

pub async fn popular_exercises(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ExerciseCount>>, ApiError> {
    Ok(Json(state.services.exercises.most_popular(POPULAR_EXERCISES).await?))
}

pub async fn big_three_progress(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<BTreeMap<&'static str, BTreeMap<NaiveDate, f64>>>, ApiError> {
    Ok(Json(state.services.exercises.big_three_progress(&username).await?))
}
