use std::fmt::Write as _;

use stronger_core::{Activity, BodyWeight, User, UserCounts};
use stronger_service::UserDay;

use super::layout::{attr, esc, feed, user_links};

fn counters(counts: &UserCounts) -> String {
    format!(
        r#"<ul class="counters"><li>{} following</li><li>{} followers</li><li>{} groups</li><li>{} meals</li><li>{} workouts</li></ul>"#,
        counts.following, counts.followers, counts.groups, counts.meals, counts.workouts,
    )
}

pub fn dashboard(
    user: &User,
    counts: &UserCounts,
    bodyweight: Option<&BodyWeight>,
    news: &[Activity],
    following: &[User],
) -> String {
    let weight = bodyweight.map_or_else(
        || "<p>No bodyweight recorded yet.</p>".to_owned(),
        |b| format!("<p>Current bodyweight: {} kg ({})</p>", b.weight, b.date),
    );
    format!(
        r#"<p>Welcome back, {name}.</p>
{counters}
{weight}
<p><a href="/record-workout">Record a workout</a> | <a href="/nutrition">Log nutrition</a></p>
<section><h2>News</h2>{news}</section>
<section><h2>Friends</h2>{friends}</section>"#,
        name = esc(&user.username),
        counters = counters(counts),
        news = feed(news),
        friends = user_links(following),
    )
}

/// Viewer's relationship to the profile being shown.
pub enum FollowState {
    OwnProfile,
    Following,
    NotFollowing,
}

pub struct ProfileData<'a> {
    pub user: &'a User,
    pub counts: &'a UserCounts,
    pub news: &'a [Activity],
    pub followers: &'a [User],
    pub following: &'a [User],
    pub follow_state: FollowState,
}

pub fn profile(data: &ProfileData<'_>) -> String {
    let path = attr(&data.user.profile_path()).into_owned();
    let button = match data.follow_state {
        FollowState::OwnProfile => r#"<p><a href="/settings">Edit your profile</a></p>"#.to_owned(),
        FollowState::Following => format!(
            r#"<form method="post" action="{path}unfollow"><button type="submit">Unfollow</button></form>"#
        ),
        FollowState::NotFollowing => format!(
            r#"<form method="post" action="{path}follow"><button type="submit">Follow</button></form>"#
        ),
    };
    format!(
        r#"{card}
{button}
{counters}
<p><a href="/ajax/big-three-progress/{name}/">Big three progress</a></p>
<section><h2>Activity</h2>{news}</section>
<section><h2>Followers</h2>{followers}</section>
<section><h2>Following</h2>{following}</section>"#,
        card = super::accounts::profile_card(data.user),
        counters = counters(data.counts),
        name = attr(&data.user.username),
        news = feed(data.news),
        followers = user_links(data.followers),
        following = user_links(data.following),
    )
}

pub fn users(followers: &[User], following: &[User], newest: &[User], user_count: u64) -> String {
    format!(
        r#"<form method="get" action="/users/"><label>Find a user <input type="text" name="username"></label><button type="submit">Go</button></form>
<p>{user_count} registered users.</p>
<section><h2>Followers</h2>{followers}</section>
<section><h2>Following</h2>{following}</section>
<section><h2>New users</h2>{newest}</section>"#,
        followers = user_links(followers),
        following = user_links(following),
        newest = user_links(newest),
    )
}

pub fn user_day(day: &UserDay) -> String {
    let mut html = format!(
        r#"<p><a href="{}">{}</a> on {}</p><section><h2>Meals</h2>"#,
        attr(&day.user.profile_path()),
        esc(&day.user.username),
        day.date,
    );
    if day.meals.is_empty() {
        html.push_str("<p>No meals recorded.</p>");
    }
    for meal in &day.meals {
        let _ = write!(
            html,
            r#"<p><a href="{}">{} kcal</a>: {} g protein, {} g carbs, {} g fats</p>"#,
            meal.path(),
            meal.calories,
            meal.protein,
            meal.carbs,
            meal.fats,
        );
    }
    html.push_str("</section><section><h2>Workouts</h2>");
    if day.workouts.is_empty() {
        html.push_str("<p>No workouts recorded.</p>");
    }
    for workout in &day.workouts {
        let _ = write!(
            html,
            r#"<p><a href="{}">{}</a></p>"#,
            workout.path(),
            esc(if workout.description.is_empty() { "Workout" } else { &workout.description }),
        );
    }
    html.push_str("</section>");
    html
}
