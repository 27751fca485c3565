use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use stronger_core::{GroupInput, User, ValidationErrors};
use stronger_service::ServiceError;

use crate::auth::PageUser;
use crate::forms::FormFields;
use crate::page_error::PageResult;
use crate::views::groups::{self, GroupPage};
use crate::views::layout::page;
use crate::AppState;

async fn render_groups(
    state: &AppState,
    user: &User,
    values: (&str, &str),
    errors: &ValidationErrors,
) -> PageResult<Html<String>> {
    let mine = state.services.social.groups_for_user(user.id).await?;
    Ok(page("Groups", Some(user), &groups::groups(&mine, values.0, values.1, errors)))
}

pub async fn groups(State(state): State<Arc<AppState>>, PageUser(user): PageUser) -> PageResult<Html<String>> {
    render_groups(&state, &user, ("", ""), &ValidationErrors::new()).await
}

pub async fn create_group(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Form(form): Form<FormFields>,
) -> PageResult<Response> {
    let result = match GroupInput::from_fields(form.get("name"), form.get("about")) {
        Ok(input) => state.services.social.create_group(user.id, &input).await,
        Err(errors) => Err(ServiceError::Validation(errors)),
    };
    match result {
        Ok(group) => {
            tracing::info!(user_id = user.id, group = %group.name, "Created group");
            Ok(Redirect::to(&group.path()).into_response())
        },
        Err(ServiceError::Validation(errors)) => {
            let values = (form.get("name"), form.get("about"));
            Ok(render_groups(&state, &user, values, &errors).await?.into_response())
        },
        Err(e) => Err(e.into()),
    }
}

async fn render_group(
    state: &AppState,
    viewer: &User,
    name: &str,
    submitted: Option<(&FormFields, &ValidationErrors)>,
) -> PageResult<Html<String>> {
    let detail = state.services.social.group_detail(name).await?;
    let no_errors = ValidationErrors::new();
    let (edit_values, errors) = match submitted {
        Some((form, errors)) => ((form.get("name"), form.get("about")), errors),
        None => ((detail.group.name.as_str(), detail.group.about.as_str()), &no_errors),
    };
    let data = GroupPage { detail: &detail, viewer, edit_values, errors };
    Ok(page(&detail.group.name, Some(viewer), &groups::group(&data)))
}

pub async fn group(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Path(name): Path<String>,
) -> PageResult<Html<String>> {
    render_group(&state, &user, &name, None).await
}

pub async fn edit_group(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Path(name): Path<String>,
    Form(form): Form<FormFields>,
) -> PageResult<Response> {
    let result = match GroupInput::from_fields(form.get("name"), form.get("about")) {
        Ok(input) => state.services.social.edit_group(user.id, &name, &input).await,
        Err(errors) => Err(ServiceError::Validation(errors)),
    };
    match result {
        Ok(group) => Ok(Redirect::to(&group.path()).into_response()),
        Err(ServiceError::Validation(errors)) => {
            Ok(render_group(&state, &user, &name, Some((&form, &errors))).await?.into_response())
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn join_group(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Path(name): Path<String>,
) -> PageResult<Redirect> {
    match state.services.social.join_group(user.id, &name).await {
        Ok(_) | Err(ServiceError::Validation(_)) => Ok(Redirect::to(&format!("/groups/{name}"))),
        Err(e) => Err(e.into()),
    }
}
