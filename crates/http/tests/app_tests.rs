//! End-to-end tests driving the router without a listening socket.

#![expect(clippy::unwrap_used, reason = "test code")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use stronger_http::{create_router, AppState};
use stronger_service::Services;
use stronger_storage::Storage;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    _dir: TempDir,
}

struct TestResponse {
    status: StatusCode,
    location: Option<String>,
    cookie: Option<String>,
    body: String,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

impl TestApp {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(&dir.path().join("test.db")).unwrap();
        let state = AppState {
            services: Services::with_bcrypt_cost(storage, 4),
            github_url: "https://example.com/stronger".to_owned(),
        };
        Self { router: create_router(Arc::new(state)), _dir: dir }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let header_str = |name: header::HeaderName| {
            response.headers().get(name).map(|v| v.to_str().unwrap().to_owned())
        };
        let location = header_str(header::LOCATION);
        let cookie = header_str(header::SET_COOKIE)
            .map(|c| c.split(';').next().unwrap_or_default().to_owned());
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse { status, location, cookie, body: String::from_utf8(bytes.to_vec()).unwrap() }
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().uri(uri);
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post_form(&self, uri: &str, cookie: Option<&str>, form: &str) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        self.send(builder.body(Body::from(form.to_owned())).unwrap()).await
    }

    async fn api(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {t}"));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            },
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    /// Sign up `username` and return the session cookie pair.
    async fn signup(&self, username: &str) -> String {
        let form = format!("username={username}&email={username}%40example.com&password=secret");
        let response = self.post_form("/signup", None, &form).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.body);
        response.cookie.unwrap()
    }

    /// Add Squat and log one workout of `weight` x 5 on 2015-03-01.
    /// Returns the workout page path.
    async fn record_squat(&self, cookie: &str, weight: u32) -> String {
        self.post_form("/exercises", Some(cookie), "name=Squat&primary=Quads&secondary=Glutes").await;
        let form = format!(
            "date=2015-03-01&description=legs&form-TOTAL_FORMS=1\
             &form-0-exercise=Squat&form-0-weight={weight}&form-0-reps=5"
        );
        let response = self.post_form("/record-workout", Some(cookie), &form).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.body);
        response.location.unwrap()
    }

    async fn token(&self, username: &str) -> String {
        let body = json!({"username": username, "password": "secret"});
        let response = self.api(Method::POST, "/api/get-auth-token", None, Some(body)).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.json()["token"].as_str().unwrap().to_owned()
    }
}

#[tokio::test]
async fn anonymous_pages_redirect_to_login() {
    let app = TestApp::new();
    let response = app.get("/dashboard", None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login?next=/dashboard"));

    let home = app.get("/", None).await;
    assert_eq!(home.status, StatusCode::OK);
    assert_eq!(app.get("/health", None).await.body, "ok");
}

#[tokio::test]
async fn signup_then_login_opens_session() {
    let app = TestApp::new();
    let cookie = app.signup("alice").await;
    let dashboard = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert!(dashboard.body.contains("Welcome back, alice."));

    let bad = app.post_form("/login", None, "username=alice&password=wrong").await;
    assert_eq!(bad.status, StatusCode::OK);
    assert!(bad.body.contains("Please enter a correct username and password."));

    let good = app.post_form("/login", None, "username=alice&password=secret&next=%2Fworkouts").await;
    assert_eq!(good.status, StatusCode::SEE_OTHER);
    assert_eq!(good.location.as_deref(), Some("/workouts"));
    assert!(good.cookie.is_some());
}

#[tokio::test]
async fn login_ignores_offsite_next() {
    let app = TestApp::new();
    app.signup("alice").await;
    let response =
        app.post_form("/login", None, "username=alice&password=secret&next=%2F%2Fevil.example").await;
    assert_eq!(response.location.as_deref(), Some("/dashboard"));

    for next in ["%2F%5Cevil.example", "%2Fa%0Ab"] {
        let form = format!("username=alice&password=secret&next={next}");
        let response = app.post_form("/login", None, &form).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{next}");
        assert_eq!(response.location.as_deref(), Some("/dashboard"), "{next}");
    }
}

#[tokio::test]
async fn recording_a_workout_redirects_to_it() {
    let app = TestApp::new();
    let cookie = app.signup("alice").await;
    let added = app.post_form("/exercises", Some(&cookie), "name=Squat&primary=Quads&secondary=Glutes").await;
    assert_eq!(added.location.as_deref(), Some("/exercises/squat"));

    let form = "date=2015-03-01&description=legs&comments=&form-TOTAL_FORMS=2\
                &form-0-exercise=Squat&form-0-weight=100&form-0-reps=5\
                &form-1-exercise=&form-1-weight=&form-1-reps=";
    let response = app.post_form("/record-workout", Some(&cookie), form).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.body);
    let location = response.location.unwrap();
    assert!(location.starts_with("/workouts/"));

    let page = app.get(&location, Some(&cookie)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("legs"));

    let id = location.trim_start_matches("/workouts/");
    let chart = app.get(&format!("/ajax/workout/{id}"), Some(&cookie)).await.json();
    assert_eq!(chart["rep-ranges"]["strength"], 1);
}

#[tokio::test]
async fn invalid_workout_is_rerendered_with_errors() {
    let app = TestApp::new();
    let cookie = app.signup("alice").await;
    let form = "date=yesterday&description=legs&form-TOTAL_FORMS=1\
                &form-0-exercise=Squat&form-0-weight=heavy&form-0-reps=5";
    let response = app.post_form("/record-workout", Some(&cookie), form).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Enter a valid date (YYYY-MM-DD)."));
    assert!(response.body.contains("Enter a valid number."));
    assert!(response.body.contains(r#"value="legs""#));
}

#[tokio::test]
async fn second_weigh_in_on_same_day_is_rejected() {
    let app = TestApp::new();
    let cookie = app.signup("alice").await;
    let first = app.post_form("/nutrition/bodyweight", Some(&cookie), "date=2015-03-01&bodyweight=80").await;
    assert_eq!(first.location.as_deref(), Some("/nutrition"));

    let second = app.post_form("/nutrition/bodyweight", Some(&cookie), "date=2015-03-01&bodyweight=81").await;
    assert_eq!(second.status, StatusCode::OK);
    assert!(second.body.contains("You have already recorded your bodyweight for this date."));
}

#[tokio::test]
async fn following_twice_is_rejected() {
    let app = TestApp::new();
    let cookie = app.signup("alice").await;
    app.signup("bob").await;

    let first = app.post_form("/users/bob/follow", Some(&cookie), "").await;
    assert_eq!(first.location.as_deref(), Some("/users/bob/"));
    let second = app.post_form("/users/bob/follow", Some(&cookie), "").await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert!(second.body.contains("You already follow this user."));
}

#[tokio::test]
async fn malformed_user_day_is_not_found() {
    let app = TestApp::new();
    let cookie = app.signup("alice").await;
    assert_eq!(app.get("/user/alice/2015-02-30", Some(&cookie)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/user/alice/2015-02-03", Some(&cookie)).await.status, StatusCode::OK);
}

#[tokio::test]
async fn chart_endpoints_need_login_and_validate_days_back() {
    let app = TestApp::new();
    let anonymous = app.get("/ajax/workouts/?days-back=7", None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let cookie = app.signup("alice").await;
    let bad = app.get("/ajax/nutrition-summary/?days-back=zero", Some(&cookie)).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad.json()["fields"][0]["field"], "days-back");

    let summary = app.get("/ajax/nutrition-summary/?days-back=14", Some(&cookie)).await.json();
    assert!(summary.get("calorie-tracker").is_some());
    assert!(summary.get("macro-breakdown").is_some());
}

#[tokio::test]
async fn rest_api_requires_token() {
    let app = TestApp::new();
    let anonymous = app.api(Method::GET, "/api/workouts", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert!(anonymous.json()["error"].is_string());

    app.signup("alice").await;
    let bad = app.api(Method::POST, "/api/get-auth-token", None, Some(json!({"username": "alice", "password": "x"}))).await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);

    let token = app.token("alice").await;
    let users = app.api(Method::GET, "/api/users", Some(&token), None).await;
    assert_eq!(users.status, StatusCode::OK);
    let users = users.json();
    assert_eq!(users[0]["username"], "alice");
    assert!(users[0].get("password").is_none());
}

#[tokio::test]
async fn rest_workouts_embed_sets_and_writes_are_owner_only() {
    let app = TestApp::new();
    app.signup("alice").await;
    app.signup("bob").await;
    let alice = app.token("alice").await;
    let bob = app.token("bob").await;

    let exercise = json!({"name": "Bench Press", "primary_muscle": "Chest", "secondary_muscles": "Triceps"});
    let created = app.api(Method::POST, "/api/exercises", Some(&alice), Some(exercise)).await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    assert_eq!(created.json()["primary_muscle"], "Chest");

    let workout = json!({
        "date": "2015-03-01",
        "description": "push",
        "sets": [{"exercise": "Bench Press", "weight": 80.0, "reps": 5}],
    });
    let created = app.api(Method::POST, "/api/workouts", Some(&alice), Some(workout)).await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    let id = created.json()["id"].as_i64().unwrap();
    assert_eq!(created.json()["sets"].as_array().unwrap().len(), 1);

    let uri = format!("/api/workouts/{id}");
    let denied = app.api(Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    let removed = app.api(Method::DELETE, &uri, Some(&alice), None).await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);
    assert_eq!(app.api(Method::GET, &uri, Some(&alice), None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rest_group_members_join_approved_without_admin() {
    let app = TestApp::new();
    app.signup("alice").await;
    app.signup("bob").await;
    let alice = app.token("alice").await;
    let bob = app.token("bob").await;

    let group = app.api(Method::POST, "/api/groups", Some(&alice), Some(json!({"name": "lifters"}))).await;
    assert_eq!(group.status, StatusCode::CREATED, "{}", group.body);

    let joined = app.api(Method::POST, "/api/groupmembers", Some(&bob), Some(json!({"group": "lifters"}))).await;
    assert_eq!(joined.status, StatusCode::CREATED, "{}", joined.body);
    let member = joined.json();
    assert_eq!(member["approved"], true);
    assert_eq!(member["admin"], false);

    let again = app.api(Method::POST, "/api/groupmembers", Some(&bob), Some(json!({"group": "lifters"}))).await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rest_bodyweight_is_unique_per_day() {
    let app = TestApp::new();
    app.signup("alice").await;
    let token = app.token("alice").await;
    let weigh_in = json!({"date": "2015-03-01", "bodyweight": 80});
    let first = app.api(Method::POST, "/api/bodyweight", Some(&token), Some(weigh_in.clone())).await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.json()["bodyweight"], 80);

    let second = app.api(Method::POST, "/api/bodyweight", Some(&token), Some(weigh_in)).await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.json()["fields"][0]["field"], "date");
}

#[tokio::test]
async fn exercise_names_must_fit_in_a_url() {
    let app = TestApp::new();
    let cookie = app.signup("alice").await;
    let response =
        app.post_form("/exercises", Some(&cookie), "name=Pull-up%2FChin-up&primary=Back&secondary=Biceps").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Exercise names may only contain letters, numbers, spaces and hyphens."));

    let accented =
        app.post_form("/exercises", Some(&cookie), "name=D%C3%A9velopp%C3%A9&primary=Chest&secondary=Triceps").await;
    assert_eq!(accented.status, StatusCode::OK);
    assert!(accented.location.is_none());

    let plain = app.post_form("/exercises", Some(&cookie), "name=Pull-up&primary=Back&secondary=Biceps").await;
    assert_eq!(plain.location.as_deref(), Some("/exercises/pull-up"));
    assert_eq!(app.get("/exercises/pull-up", Some(&cookie)).await.status, StatusCode::OK);
}

#[tokio::test]
async fn exercise_history_separates_personal_and_site_records() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    app.record_squat(&alice, 100).await;

    let anonymous = app.get("/ajax/exercises/squat?reps=5", None).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    let history = anonymous.json();
    let records = &history["exercise-records"];
    assert_eq!(records["personal_records"]["5"][0], 0.0);
    assert!(records["personal_records"]["5"][1].is_null());
    assert_eq!(records["site_records"]["5"][0], 100.0);
    assert_eq!(records["site_records"]["5"][1], "alice");
    assert_eq!(records["site_records"].as_object().unwrap().len(), 10);
    assert!(history["exercise-progress"].as_object().unwrap().is_empty());

    let mine = app.get("/ajax/exercises/squat?reps=5", Some(&alice)).await.json();
    assert_eq!(mine["exercise-records"]["personal_records"]["5"][1], "alice");
    assert_eq!(mine["exercise-progress"]["2015-03-01"], 100.0);

    let other_reps = app.get("/ajax/exercises/squat?reps=3", Some(&alice)).await.json();
    assert!(other_reps["exercise-progress"].as_object().unwrap().is_empty());

    assert_eq!(app.get("/ajax/exercises/curl", None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn popular_exercises_and_big_three_progress() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    app.record_squat(&alice, 120).await;

    let popular = app.get("/ajax/popular-exercises", None).await;
    assert_eq!(popular.status, StatusCode::OK);
    assert_eq!(popular.json(), json!([{"name": "Squat", "sets": 1}]));

    let progress = app.get("/ajax/big-three-progress/alice/", None).await.json();
    assert_eq!(progress["squat"]["2015-03-01"], 120.0);
    assert!(progress["deadlift"].as_object().unwrap().is_empty());
    assert!(progress["bench"].as_object().unwrap().is_empty());

    let unknown = app.get("/ajax/big-three-progress/nobody/", None).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_boxes_redirect_to_the_match() {
    let app = TestApp::new();
    let alice = app.signup("alice").await;
    let workout = app.record_squat(&alice, 100).await;

    let exercise = app.get("/exercises?name=Squat", Some(&alice)).await;
    assert_eq!(exercise.status, StatusCode::SEE_OTHER);
    assert_eq!(exercise.location.as_deref(), Some("/exercises/squat"));

    let id = workout.trim_start_matches("/workouts/");
    let found = app.get(&format!("/workouts?name={id}"), Some(&alice)).await;
    assert_eq!(found.location.as_deref(), Some(workout.as_str()));

    let user = app.get("/users/?username=alice", Some(&alice)).await;
    assert_eq!(user.location.as_deref(), Some("/users/alice/"));

    assert_eq!(app.get("/exercises?name=Curl", Some(&alice)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/users/?username=nobody", Some(&alice)).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rest_goals_crud_is_owner_only() {
    let app = TestApp::new();
    let alice_cookie = app.signup("alice").await;
    app.signup("bob").await;
    app.record_squat(&alice_cookie, 100).await;
    let alice = app.token("alice").await;
    let bob = app.token("bob").await;

    let unknown = json!({"exercise": "Curl", "weight": 50.0, "reps": 5, "objective_date": "2015-06-01"});
    let rejected = app.api(Method::POST, "/api/goals", Some(&alice), Some(unknown)).await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected.json()["fields"][0]["field"], "exercise");

    let goal = json!({"exercise": "Squat", "weight": 150.0, "reps": 5, "objective_date": "2015-06-01"});
    let created = app.api(Method::POST, "/api/goals", Some(&alice), Some(goal)).await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    let created = created.json();
    assert!(created["completed_date"].is_null());
    let uri = format!("/api/goals/{}", created["id"]);

    let fetched = app.api(Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(fetched.json()["weight"], 150.0);

    let done = json!({
        "exercise": "Squat", "weight": 150.0, "reps": 5,
        "objective_date": "2015-06-01", "completed_date": "2015-05-20",
    });
    let denied = app.api(Method::PUT, &uri, Some(&bob), Some(done.clone())).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    let updated = app.api(Method::PUT, &uri, Some(&alice), Some(done)).await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    assert_eq!(updated.json()["completed_date"], "2015-05-20");

    assert_eq!(app.api(Method::DELETE, &uri, Some(&bob), None).await.status, StatusCode::FORBIDDEN);
    assert_eq!(app.api(Method::DELETE, &uri, Some(&alice), None).await.status, StatusCode::NO_CONTENT);
    assert_eq!(app.api(Method::GET, &uri, Some(&alice), None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rest_friends_reject_duplicates_and_updates() {
    let app = TestApp::new();
    app.signup("alice").await;
    app.signup("bob").await;
    let alice = app.token("alice").await;
    let bob = app.token("bob").await;
    let bob_id = app.api(Method::GET, "/api/users/bob", Some(&alice), None).await.json()["id"].clone();

    let created = app.api(Method::POST, "/api/friends", Some(&alice), Some(json!({"friend": bob_id}))).await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    let edge = created.json();
    assert_eq!(edge["friend"], bob_id);

    let again = app.api(Method::POST, "/api/friends", Some(&alice), Some(json!({"friend": bob_id}))).await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.json()["fields"][0]["field"], "friend");

    let uri = format!("/api/friends/{}", edge["id"]);
    let put = app.api(Method::PUT, &uri, Some(&alice), Some(json!({"friend": bob_id}))).await;
    assert_eq!(put.status, StatusCode::METHOD_NOT_ALLOWED);

    let listed = app.api(Method::GET, "/api/friends", Some(&bob), None).await.json();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    assert_eq!(app.api(Method::DELETE, &uri, Some(&bob), None).await.status, StatusCode::FORBIDDEN);
    assert_eq!(app.api(Method::DELETE, &uri, Some(&alice), None).await.status, StatusCode::NO_CONTENT);
    assert_eq!(app.api(Method::GET, &uri, Some(&alice), None).await.status, StatusCode::NOT_FOUND);
}
