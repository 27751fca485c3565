use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::NaiveDate;
use stronger_core::constants::FEED_LENGTH;

use crate::auth::PageUser;
use crate::page_error::{PageError, PageResult};
use crate::query_types::UsernameQuery;
use crate::views::layout::page;
use crate::views::users::{self, FollowState, ProfileData};
use crate::AppState;

const NEW_USERS: usize = 6;

pub async fn dashboard(State(state): State<Arc<AppState>>, PageUser(user): PageUser) -> PageResult<Html<String>> {
    let services = &state.services;
    let counts = services.accounts.user_counts(user.id).await?;
    let bodyweight = services.nutrition.current_bodyweight(user.id).await?;
    let news = services.social.activity_feed(None, FEED_LENGTH).await?;
    let following = services.social.following(user.id).await?;
    let body = users::dashboard(&user, &counts, bodyweight.as_ref(), &news, &following);
    Ok(page("Dashboard", Some(&user), &body))
}

pub async fn users(
    State(state): State<Arc<AppState>>,
    PageUser(user): PageUser,
    Query(query): Query<UsernameQuery>,
) -> PageResult<Response> {
    if let Some(username) = query.username.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        let found = state.services.accounts.get_user_by_username(username).await?;
        return Ok(Redirect::to(&found.profile_path()).into_response());
    }
    let services = &state.services;
    let followers = services.social.followers(user.id).await?;
    let following = services.social.following(user.id).await?;
    let newest = services.accounts.newest_users(NEW_USERS).await?;
    let stats = services.accounts.site_stats().await?;
    let body = users::users(&followers, &following, &newest, stats.users);
    Ok(page("Users", Some(&user), &body).into_response())
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    PageUser(viewer): PageUser,
    Path(username): Path<String>,
) -> PageResult<Html<String>> {
    let services = &state.services;
    let user = services.accounts.get_user_by_username(&username).await?;
    let counts = services.accounts.user_counts(user.id).await?;
    let news = services.social.activity_feed(Some(user.id), FEED_LENGTH).await?;
    let followers = services.social.followers(user.id).await?;
    let following = services.social.following(user.id).await?;
    let follow_state = if viewer.id == user.id {
        FollowState::OwnProfile
    } else if services.social.friendship(viewer.id, user.id).await?.is_some() {
        FollowState::Following
    } else {
        FollowState::NotFollowing
    };
    let data = ProfileData {
        user: &user,
        counts: &counts,
        news: &news,
        followers: &followers,
        following: &following,
        follow_state,
    };
    Ok(page(&user.username, Some(&viewer), &users::profile(&data)))
}

pub async fn follow(
    State(state): State<Arc<AppState>>,
    PageUser(viewer): PageUser,
    Path(username): Path<String>,
) -> PageResult<Redirect> {
    let user = state.services.accounts.get_user_by_username(&username).await?;
    state.services.social.follow(viewer.id, user.id).await?;
    tracing::info!(user_id = viewer.id, friend_id = user.id, "Followed user");
    Ok(Redirect::to(&user.profile_path()))
}

pub async fn unfollow(
    State(state): State<Arc<AppState>>,
    PageUser(viewer): PageUser,
    Path(username): Path<String>,
) -> PageResult<Redirect> {
    let user = state.services.accounts.get_user_by_username(&username).await?;
    state.services.social.unfollow(viewer.id, user.id).await?;
    Ok(Redirect::to(&user.profile_path()))
}

pub async fn user_day(
    State(state): State<Arc<AppState>>,
    PageUser(viewer): PageUser,
    Path((username, date)): Path<(String, String)>,
) -> PageResult<Html<String>> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| PageError::NotFound)?;
    let day = state.services.social.user_day(&username, date).await?;
    Ok(page(&format!("{} on {date}", day.user.username), Some(&viewer), &users::user_day(&day)))
}
