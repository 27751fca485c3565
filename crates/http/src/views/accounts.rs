use std::fmt::Write as _;

use stronger_core::{Activity, TrainingGoal, User, ValidationErrors};
use stronger_storage::SiteStats;

use super::layout::{attr, error_list, esc, feed, input, select};

pub fn home(stats: &SiteStats, news: &[Activity], logged_in: bool) -> String {
    let call_to_action = if logged_in {
        r#"<p><a href="/dashboard">Go to your dashboard</a></p>"#
    } else {
        r#"<p><a href="/signup">Sign up</a> or <a href="/login">log in</a> to start tracking.</p>"#
    };
    format!(
        r#"<p>Track your lifts, your meals and your bodyweight, and see how your friends are doing.</p>
{call_to_action}
<section><h2>Community</h2>
<p>{users} lifters have recorded {workouts} workouts, {sets} sets and {meals} days of nutrition.</p>
</section>
<section><h2>Latest activity</h2>{news}</section>"#,
        users = stats.users,
        workouts = stats.workouts,
        sets = stats.sets,
        meals = stats.nutrition_records,
        news = feed(news),
    )
}

pub fn about(github_url: &str) -> String {
    format!(
        r#"<p>Stronger is a training log for strength athletes. Record workouts set by set,
track calories and macros, follow friends and compare records.</p>
<p>The source is on <a href="{url}">GitHub</a>.</p>"#,
        url = attr(github_url),
    )
}

pub fn login(username: &str, next: &str, errors: &ValidationErrors) -> String {
    format!(
        r#"{errors}<form method="post" action="/login">
{username}
{password}
<input type="hidden" name="next" value="{next}">
<button type="submit">Log in</button>
</form>
<p>No account? <a href="/signup">Sign up</a>.</p>"#,
        errors = error_list(errors),
        username = input("username", "Username", "text", username),
        password = input("password", "Password", "password", ""),
        next = attr(next),
    )
}

pub fn signup(username: &str, email: &str, errors: &ValidationErrors) -> String {
    format!(
        r#"{errors}<form method="post" action="/signup">
{username}
{email}
{password}
<button type="submit">Sign up</button>
</form>"#,
        errors = error_list(errors),
        username = input("username", "Username", "text", username),
        email = input("email", "Email", "email", email),
        password = input("password", "Password", "password", ""),
    )
}

/// Raw settings values, either from the stored profile or a rejected
/// submission.
pub struct SettingsValues<'a> {
    pub email: &'a str,
    pub avatar_url: &'a str,
    pub gym: &'a str,
    pub goal: &'a str,
    pub about: &'a str,
    pub height: String,
}

impl<'a> SettingsValues<'a> {
    pub fn from_user(user: &'a User) -> Self {
        Self {
            email: &user.email,
            avatar_url: &user.avatar_url,
            gym: &user.gym,
            goal: user.goal.map_or("", |g| g.code()),
            about: &user.about,
            height: user.height.map(|h| h.to_string()).unwrap_or_default(),
        }
    }
}

pub fn settings(values: &SettingsValues<'_>, errors: &ValidationErrors, saved: bool) -> String {
    let goals = std::iter::once(("", "No goal")).chain(TrainingGoal::ALL.iter().map(|g| (g.code(), g.label())));
    let mut html = String::new();
    if saved {
        html.push_str(r#"<p class="notice">Settings saved.</p>"#);
    }
    let _ = write!(
        html,
        r#"{errors}<form method="post" action="/settings">
{email}
{avatar}
{gym}
{goal}
{about}
{height}
<button type="submit">Save</button>
</form>"#,
        errors = error_list(errors),
        email = input("email", "Email", "email", values.email),
        avatar = input("avatar_url", "Avatar URL", "url", values.avatar_url),
        gym = input("gym", "Gym", "text", values.gym),
        goal = select("goals", "Goal", goals, values.goal),
        about = input("about", "About", "text", values.about),
        height = input("height", "Height (cm)", "number", &values.height),
    );
    html
}

pub fn profile_card(user: &User) -> String {
    format!(
        r#"<div class="profile"><img src="{avatar}" alt="" width="80">
<p>{gym}</p><p>{goal}</p><p>{about}</p></div>"#,
        avatar = attr(&user.avatar_url),
        gym = esc(&user.gym),
        goal = user.goal.map_or("", |g| g.label()),
        about = esc(&user.about),
    )
}
