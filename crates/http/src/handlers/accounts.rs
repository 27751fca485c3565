use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use stronger_core::constants::{FEED_LENGTH, SESSION_COOKIE};
use stronger_core::{ProfileUpdate, ValidationErrors};
use stronger_service::ServiceError;

use crate::auth::{MaybeUser, PageUser, removal_cookie, safe_next, session_cookie};
use crate::forms::FormFields;
use crate::page_error::PageResult;
use crate::query_types::NextQuery;
use crate::views::accounts::{self, SettingsValues};
use crate::views::layout::page;
use crate::AppState;

pub async fn home(State(state): State<Arc<AppState>>, MaybeUser(user): MaybeUser) -> PageResult<Html<String>> {
    let stats = state.services.accounts.site_stats().await?;
    let news = state.services.social.activity_feed(None, FEED_LENGTH).await?;
    Ok(page("Stronger", user.as_ref(), &accounts::home(&stats, &news, user.is_some())))
}

pub async fn about(State(state): State<Arc<AppState>>, MaybeUser(user): MaybeUser) -> Html<String> {
    page("About", user.as_ref(), &accounts::about(&state.github_url))
}

pub async fn login_page(Query(query): Query<NextQuery>) -> Html<String> {
    let next = safe_next(query.next.as_deref());
    page("Log in", None, &accounts::login("", next, &ValidationErrors::new()))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<FormFields>,
) -> PageResult<Response> {
    let next = safe_next(Some(form.get("next")));
    match state.services.accounts.login(form.get("username"), form.get("password")).await {
        Ok(session) => {
            tracing::info!(user_id = session.user.id, "Logged in");
            Ok((jar.add(session_cookie(session.session_id)), Redirect::to(next)).into_response())
        },
        Err(ServiceError::Unauthorized(_)) => {
            let errors = ValidationErrors::single(
                "__all__",
                "Please enter a correct username and password.",
            );
            Ok(page("Log in", None, &accounts::login(form.get("username"), next, &errors)).into_response())
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> PageResult<Response> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.services.accounts.logout(cookie.value()).await?;
    }
    Ok((jar.remove(removal_cookie()), Redirect::to("/")).into_response())
}

pub async fn signup_page() -> Html<String> {
    page("Sign up", None, &accounts::signup("", "", &ValidationErrors::new()))
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<FormFields>,
) -> PageResult<Response> {
    let (username, email) = (form.get("username"), form.get("email"));
    match state.services.accounts.signup(username, email, form.get("password")).await {
        Ok(session) => {
            Ok((jar.add(session_cookie(session.session_id)), Redirect::to("/dashboard")).into_response())
        },
        Err(ServiceError::Validation(errors)) => {
            Ok(page("Sign up", None, &accounts::signup(username, email, &errors)).into_response())
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn settings_page(PageUser(user): PageUser) -> Html<String> {
    let body = accounts::settings(&SettingsValues::from_user(&user), &ValidationErrors::new(), false);
    page("Settings", Some(&user), &body)
}

pub async fn settings(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Form(form): Form<FormFields>,
) -> PageResult<Html<String>> {
    let parsed = ProfileUpdate::from_fields(
        form.get("avatar_url"),
        form.get("gym"),
        form.get("goals"),
        form.get("about"),
        form.get("height"),
    );
    let result = match parsed {
        Ok(update) => save_settings(&state, user.id, form.get("email"), &update).await,
        Err(errors) => Err(ServiceError::Validation(errors)),
    };
    match result {
        Ok(updated) => {
            let body = accounts::settings(&SettingsValues::from_user(&updated), &ValidationErrors::new(), true);
            Ok(page("Settings", Some(&updated), &body))
        },
        Err(ServiceError::Validation(errors)) => {
            let values = SettingsValues {
                email: form.get("email"),
                avatar_url: form.get("avatar_url"),
                gym: form.get("gym"),
                goal: form.get("goals"),
                about: form.get("about"),
                height: form.get("height").to_owned(),
            };
            Ok(page("Settings", Some(&user), &accounts::settings(&values, &errors, false)))
        },
        Err(e) => Err(e.into()),
    }
}

async fn save_settings(
    state: &AppState,
    user_id: i64,
    email: &str,
    update: &ProfileUpdate,
) -> stronger_service::Result<stronger_core::User> {
    let email = email.trim();
    if !email.is_empty() {
        state.services.accounts.update_email(user_id, email).await?;
    }
    state.services.accounts.update_settings(user_id, update).await
}
