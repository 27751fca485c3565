//! Request authentication.
//!
//! Pages authenticate with the session cookie. The REST API also accepts
//! `Authorization: Token <key>`.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use stronger_core::User;
use stronger_core::constants::SESSION_COOKIE;
use stronger_service::Result as ServiceResult;

use crate::AppState;
use crate::api_error::ApiError;
use crate::page_error::PageError;

/// Key from an `Authorization: Token <key>` header.
fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, key) = value.trim().split_once(' ')?;
    scheme.eq_ignore_ascii_case("token").then(|| key.trim()).filter(|k| !k.is_empty())
}

async fn resolve_user(headers: &HeaderMap, state: &AppState) -> ServiceResult<Option<User>> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Some(user) = state.services.accounts.user_for_session(cookie.value()).await? {
            return Ok(Some(user));
        }
    }
    match token_from_headers(headers) {
        Some(key) => state.services.accounts.user_for_token(key).await,
        None => Ok(None),
    }
}

/// Session cookie for a freshly opened web session.
pub fn session_cookie(session_id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Cookie value that clears the session.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Only relative, same-site paths are followed after login.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with("/\\")
                && path.bytes().all(|b| b.is_ascii_graphic()) =>
        {
            path
        }
        _ => "/dashboard",
    }
}

/// The logged-in user, if any.
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_user(&parts.headers, state).await?))
    }
}

/// A logged-in user for an HTML page. Anonymous visitors are sent to the
/// login page with `next` pointing back here.
pub struct PageUser(pub User);

impl FromRequestParts<Arc<AppState>> for PageUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        match resolve_user(&parts.headers, state).await {
            Ok(Some(user)) => Ok(Self(user)),
            Ok(None) => {
                let target = format!("/login?next={}", parts.uri.path());
                Err(Redirect::to(&target).into_response())
            },
            Err(e) => Err(PageError::from(e).into_response()),
        }
    }
}

/// A logged-in user for JSON endpoints. Anonymous requests get 401.
pub struct ApiUser(pub User);

impl FromRequestParts<Arc<AppState>> for ApiUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        resolve_user(&parts.headers, state)
            .await?
            .map(Self)
            .ok_or_else(|| ApiError::Unauthorized("Authentication credentials were not provided.".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn token_header_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_headers(&headers), None);
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc123"));
        assert_eq!(token_from_headers(&headers), Some("abc123"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(token_from_headers(&headers), None);
    }

    #[test]
    fn next_must_stay_on_site() {
        assert_eq!(safe_next(Some("/workouts")), "/workouts");
        assert_eq!(safe_next(Some("//evil.example")), "/dashboard");
        assert_eq!(safe_next(Some("https://evil.example")), "/dashboard");
        assert_eq!(safe_next(Some("/\\evil.example")), "/dashboard");
        assert_eq!(safe_next(Some("/a\nb")), "/dashboard");
        assert_eq!(safe_next(Some("/caf\u{e9}")), "/dashboard");
        assert_eq!(safe_next(Some("/workouts?page=2")), "/workouts?page=2");
        assert_eq!(safe_next(None), "/dashboard");
    }
}
