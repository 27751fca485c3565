//! HTTP server for stronger: HTML pages, chart endpoints and the REST API.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(clippy::absolute_paths, reason = "Explicit paths for clarity")]
#![allow(missing_copy_implementations, reason = "Types may grow")]
#![allow(clippy::let_underscore_untyped, reason = "Type is clear from context")]
#![allow(let_underscore_drop, reason = "Intentionally dropping values")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::shadow_reuse, reason = "Shadowing for Arc clones is idiomatic")]
#![allow(clippy::shadow_unrelated, reason = "Shadowing in async blocks is idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]
#![allow(clippy::single_call_fn, reason = "Helper functions improve readability")]

pub mod api_error;
mod api_types;
mod auth;
mod forms;
mod handlers;
mod page_error;
mod query_types;
mod views;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use stronger_service::Services;
use tower_http::trace::TraceLayer;

/// Shared application state for all HTTP handlers.
///
/// Wrapped in `Arc` for thread-safe sharing across handlers.
pub struct AppState {
    /// Business logic over the shared storage pool
    pub services: Services,
    /// Source link shown on the about page
    pub github_url: String,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(page_routes())
        .merge(chart_routes())
        .merge(api_routes())
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn page_routes() -> Router<Arc<AppState>> {
    use handlers::{accounts, exercises, groups, nutrition, users, workouts};

    Router::new()
        .route("/", get(accounts::home))
        .route("/about", get(accounts::about))
        .route("/login", get(accounts::login_page).post(accounts::login))
        .route("/logout", get(accounts::logout))
        .route("/signup", get(accounts::signup_page).post(accounts::signup))
        .route("/settings", get(accounts::settings_page).post(accounts::settings))
        .route("/dashboard", get(users::dashboard))
        .route("/users/", get(users::users))
        .route("/users/{username}/", get(users::profile))
        .route("/users/{username}/follow", post(users::follow))
        .route("/users/{username}/unfollow", post(users::unfollow))
        .route("/user/{username}/{date}", get(users::user_day))
        .route("/workouts", get(workouts::workouts))
        .route("/workouts/{id}", get(workouts::workout).post(workouts::edit_workout))
        .route("/workouts/{id}/delete", post(workouts::delete_workout))
        .route("/record-workout", get(workouts::record_workout_page).post(workouts::record_workout))
        .route("/exercises", get(exercises::exercises).post(exercises::add_exercise))
        .route("/exercises/{clean_name}", get(exercises::exercise).post(exercises::edit_exercise))
        .route("/nutrition", get(nutrition::nutrition).post(nutrition::record_nutrition))
        .route("/nutrition/bodyweight", post(nutrition::record_bodyweight))
        .route("/nutrition/{id}", get(nutrition::meal).post(nutrition::edit_meal))
        .route("/nutrition/{id}/delete", post(nutrition::delete_meal))
        .route("/groups", get(groups::groups).post(groups::create_group))
        .route("/groups/{name}", get(groups::group).post(groups::edit_group))
        .route("/groups/{name}/join", post(groups::join_group))
}

fn chart_routes() -> Router<Arc<AppState>> {
    use handlers::{exercises, nutrition, workouts};

    Router::new()
        .route("/ajax/workout/{id}", get(workouts::workout_chart))
        .route("/ajax/workouts/", get(workouts::workouts_summary))
        .route("/ajax/exercises/{clean_name}", get(exercises::exercise_history))
        .route("/ajax/popular-exercises", get(exercises::popular_exercises))
        .route("/ajax/big-three-progress/{username}/", get(exercises::big_three_progress))
        .route("/ajax/nutrition-summary/", get(nutrition::nutrition_summary))
}

fn api_routes() -> Router<Arc<AppState>> {
    use handlers::{api_accounts, api_nutrition, api_social, api_training};

    Router::new()
        .route("/api/get-auth-token", post(api_accounts::get_auth_token))
        .route("/api/users", get(api_accounts::list_users).post(api_accounts::create_user))
        .route(
            "/api/users/{username}",
            get(api_accounts::get_user).put(api_accounts::update_user).delete(api_accounts::delete_user),
        )
        .route("/api/workouts", get(api_training::list_workouts).post(api_training::create_workout))
        .route(
            "/api/workouts/{id}",
            get(api_training::get_workout).put(api_training::update_workout).delete(api_training::delete_workout),
        )
        .route("/api/exercises", get(api_training::list_exercises).post(api_training::create_exercise))
        .route(
            "/api/exercises/{clean_name}",
            get(api_training::get_exercise)
                .put(api_training::update_exercise)
                .delete(api_training::delete_exercise),
        )
        .route("/api/goals", get(api_training::list_goals).post(api_training::create_goal))
        .route(
            "/api/goals/{id}",
            get(api_training::get_goal).put(api_training::update_goal).delete(api_training::delete_goal),
        )
        .route("/api/nutrition", get(api_nutrition::list_nutrition).post(api_nutrition::create_nutrition))
        .route(
            "/api/nutrition/{id}",
            get(api_nutrition::get_nutrition)
                .put(api_nutrition::update_nutrition)
                .delete(api_nutrition::delete_nutrition),
        )
        .route("/api/bodyweight", get(api_nutrition::list_bodyweights).post(api_nutrition::create_bodyweight))
        .route(
            "/api/bodyweight/{id}",
            get(api_nutrition::get_bodyweight)
                .put(api_nutrition::update_bodyweight)
                .delete(api_nutrition::delete_bodyweight),
        )
        .route("/api/friends", get(api_social::list_friends).post(api_social::create_friend))
        .route("/api/friends/{id}", get(api_social::get_friend).delete(api_social::delete_friend))
        .route("/api/groups", get(api_social::list_groups).post(api_social::create_group))
        .route(
            "/api/groups/{name}",
            get(api_social::get_group).put(api_social::update_group).delete(api_social::delete_group),
        )
        .route("/api/groupmembers", get(api_social::list_members).post(api_social::create_member))
        .route(
            "/api/groupmembers/{id}",
            get(api_social::get_member).put(api_social::update_member).delete(api_social::delete_member),
        )
}

async fn health() -> &'static str {
    "ok"
}
