use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use chrono::Local;
use stronger_core::analytics::NutritionSummary;
use stronger_core::constants::{DEFAULT_NUTRITION_DAYS_BACK, HISTORY_ROWS, MAX_DAYS_BACK, MOST_FREQUENT_USERS};
use stronger_core::{BodyWeightInput, NutritionInput, User, ValidationErrors};
use stronger_service::{ServiceError, parse_days_back};

use crate::api_error::ApiError;
use crate::auth::{ApiUser, PageUser};
use crate::forms::FormFields;
use crate::page_error::PageResult;
use crate::query_types::DaysBackQuery;
use crate::views::layout::page;
use crate::views::nutrition::{self, MealPage, NutritionNumbers, NutritionPage, NutritionValues};
use crate::AppState;

const OWN_HISTORY_ROWS: usize = 5;

fn today() -> String {
    Local::now().date_naive().to_string()
}

fn submitted_values(form: &FormFields) -> NutritionValues<'_> {
    NutritionValues {
        date: form.get("date").to_owned(),
        calories: form.get("calories"),
        protein: form.get("protein"),
        carbs: form.get("carbs"),
        fats: form.get("fats"),
    }
}

fn parse_nutrition(form: &FormFields) -> Result<NutritionInput, ServiceError> {
    NutritionInput::from_fields(
        form.get("date"),
        form.get("calories"),
        form.get("protein"),
        form.get("carbs"),
        form.get("fats"),
    )
    .map_err(ServiceError::Validation)
}

/// Which of the two forms on the nutrition page was rejected.
enum Rejected<'a> {
    Nothing,
    Meal(&'a FormFields, &'a ValidationErrors),
    Bodyweight(&'a FormFields, &'a ValidationErrors),
}

async fn render_nutrition(state: &AppState, user: &User, rejected: Rejected<'_>) -> PageResult<Html<String>> {
    let service = &state.services.nutrition;
    let bodyweights = service.bodyweight_history(user.id).await?;
    let history = service.list_nutrition(Some(user.id), OWN_HISTORY_ROWS).await?;
    let averages = service.average_calories(user.id).await?;
    let most_nutrition = service.most_frequent_users(MOST_FREQUENT_USERS).await?;
    let friends = service.friend_nutrition(user.id, HISTORY_ROWS).await?;
    let no_errors = ValidationErrors::new();
    let blank_meal = || NutritionValues { date: today(), ..NutritionValues::default() };
    let date = today();
    let (meal_values, meal_errors, weight_values, weight_errors) = match rejected {
        Rejected::Nothing => (blank_meal(), &no_errors, (date.as_str(), ""), &no_errors),
        Rejected::Meal(form, errors) => (submitted_values(form), errors, (date.as_str(), ""), &no_errors),
        Rejected::Bodyweight(form, errors) => {
            (blank_meal(), &no_errors, (form.get("date"), form.get("bodyweight")), errors)
        },
    };
    let data = NutritionPage {
        bodyweights: &bodyweights,
        history: &history,
        averages,
        most_nutrition: &most_nutrition,
        friends: &friends,
        meal_values,
        meal_errors,
        weight_values,
        weight_errors,
    };
    Ok(page("Nutrition", Some(user), &nutrition::nutrition(&data)))
}

pub async fn nutrition(State(state): State<Arc<AppState>>, PageUser(user): PageUser) -> PageResult<Html<String>> {
    render_nutrition(&state, &user, Rejected::Nothing).await
}

pub async fn record_nutrition(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Form(form): Form<FormFields>,
) -> PageResult<Response> {
    let result = match parse_nutrition(&form) {
        Ok(input) => state.services.nutrition.record_nutrition(user.id, &input).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(record) => {
            tracing::info!(user_id = user.id, record_id = record.id, "Recorded nutrition");
            Ok(Redirect::to(&record.path()).into_response())
        },
        Err(ServiceError::Validation(errors)) => {
            Ok(render_nutrition(&state, &user, Rejected::Meal(&form, &errors)).await?.into_response())
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn record_bodyweight(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Form(form): Form<FormFields>,
) -> PageResult<Response> {
    let result = match BodyWeightInput::from_fields(form.get("date"), form.get("bodyweight")) {
        Ok(input) => state.services.nutrition.record_bodyweight(user.id, &input).await,
        Err(errors) => Err(ServiceError::Validation(errors)),
    };
    match result {
        Ok(_) => Ok(Redirect::to("/nutrition").into_response()),
        Err(ServiceError::Validation(errors)) => {
            Ok(render_nutrition(&state, &user, Rejected::Bodyweight(&form, &errors)).await?.into_response())
        },
        Err(e) => Err(e.into()),
    }
}

async fn render_meal(
    state: &AppState,
    viewer: &User,
    id: i64,
    submitted: Option<(&FormFields, &ValidationErrors)>,
) -> PageResult<Html<String>> {
    let record = state.services.nutrition.get_nutrition(id).await?;
    let owner = state.services.accounts.get_user(record.user_id).await?;
    let workouts = state.services.workouts.workouts_on(owner.id, record.date).await?;
    let numbers = NutritionNumbers::from_record(&record);
    let no_errors = ValidationErrors::new();
    let (edit_values, errors) = match submitted {
        Some((form, errors)) => (submitted_values(form), errors),
        None => (numbers.values(record.date.to_string()), &no_errors),
    };
    let data = MealPage {
        record: &record,
        owner: &owner,
        workouts: &workouts,
        editable: viewer.id == owner.id,
        edit_values,
        errors,
    };
    Ok(page(&format!("Nutrition on {}", record.date), Some(viewer), &nutrition::meal(&data)))
}

pub async fn meal(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Path(id): Path<i64>,
) -> PageResult<Html<String>> {
    render_meal(&state, &user, id, None).await
}

pub async fn edit_meal(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Path(id): Path<i64>,
    Form(form): Form<FormFields>,
) -> PageResult<Html<String>> {
    let result = match parse_nutrition(&form) {
        Ok(input) => state.services.nutrition.edit_nutrition(user.id, id, &input).await.map(|_| ()),
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => render_meal(&state, &user, id, None).await,
        Err(ServiceError::Validation(errors)) => render_meal(&state, &user, id, Some((&form, &errors))).await,
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_meal(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Path(id): Path<i64>,
) -> PageResult<Redirect> {
    state.services.nutrition.delete_nutrition(user.id, id).await?;
    Ok(Redirect::to("/nutrition"))
}

pub async fn nutrition_summary(
    State(state): State<Arc<AppState>>,
    ApiUser(user): ApiUser,
    Query(query): Query<DaysBackQuery>,
) -> Result<Json<NutritionSummary>, ApiError> {
    let days_back = parse_days_back(query.days_back.as_deref(), DEFAULT_NUTRITION_DAYS_BACK, MAX_DAYS_BACK)?;
    let today = Local::now().date_naive();
    Ok(Json(state.services.nutrition.nutrition_summary(user.id, days_back, today).await?))
}
