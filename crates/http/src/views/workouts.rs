use std::fmt::Write as _;

use stronger_core::{Exercise, User, ValidationErrors, Workout, WorkoutWithSets};
use stronger_storage::UserCount;

use super::layout::{attr, error_list, esc, input, leaderboard};

/// Blank set rows offered by the record-workout form.
pub const SET_ROWS: usize = 24;

fn title(workout: &Workout) -> &str {
    if workout.description.is_empty() { "Workout" } else { &workout.description }
}

fn workout_list(workouts: impl IntoIterator<Item = (Workout, Option<String>)>) -> String {
    let mut html = String::from("<ul>");
    let mut empty = true;
    for (workout, username) in workouts {
        empty = false;
        let owner = username
            .map(|u| format!(r#" by <a href="/users/{}/">{}</a>"#, attr(&u), esc(&u)))
            .unwrap_or_default();
        let _ = write!(
            html,
            r#"<li>{date} <a href="{path}">{title}</a>{owner}</li>"#,
            date = workout.date,
            path = workout.path(),
            title = esc(title(&workout)),
        );
    }
    if empty {
        return "<p>No workouts yet.</p>".to_owned();
    }
    html.push_str("</ul>");
    html
}

pub fn workouts(most_workouts: &[UserCount], history: &[Workout], friends: &[(Workout, String)]) -> String {
    format!(
        r#"<form method="get" action="/workouts"><label>Workout id <input type="number" name="name"></label><button type="submit">Find</button></form>
<p><a href="/record-workout">Record a workout</a> | <a href="/ajax/workouts/?days-back=7">This week's chart data</a></p>
<section><h2>Your workouts</h2>{history}</section>
<section><h2>Friends' workouts</h2>{friends}</section>
<section><h2>Most workouts</h2>{leaders}</section>"#,
        history = workout_list(history.iter().map(|w| (w.clone(), None))),
        friends = workout_list(friends.iter().map(|(w, u)| (w.clone(), Some(u.clone())))),
        leaders = leaderboard(most_workouts.iter().map(|r| (r.username.as_str(), r.count))),
    )
}

/// Raw values of the workout meta fields.
pub struct WorkoutValues<'a> {
    pub date: String,
    pub description: &'a str,
    pub comments: &'a str,
}

impl<'a> WorkoutValues<'a> {
    pub fn from_workout(workout: &'a Workout) -> Self {
        Self { date: workout.date.to_string(), description: &workout.description, comments: &workout.comments }
    }
}

fn meta_fields(values: &WorkoutValues<'_>) -> String {
    format!(
        "{}\n{}\n{}",
        input("date", "Date", "date", &values.date),
        input("description", "Description", "text", values.description),
        input("comments", "Comments", "text", values.comments),
    )
}

pub struct WorkoutPage<'a> {
    pub workout: &'a WorkoutWithSets,
    pub owner: &'a User,
    pub recent: &'a [Workout],
    pub editable: bool,
    pub edit_values: WorkoutValues<'a>,
    pub errors: &'a ValidationErrors,
}

pub fn workout(data: &WorkoutPage<'_>) -> String {
    let workout = &data.workout.workout;
    let mut html = format!(
        r#"<p>{date} by <a href="{profile}">{owner}</a></p><p>{comments}</p>
<table><tr><th>Exercise</th><th>Weight</th><th>Reps</th><th>Range</th></tr>"#,
        date = workout.date,
        profile = attr(&data.owner.profile_path()),
        owner = esc(&data.owner.username),
        comments = esc(&workout.comments),
    );
    for set in &data.workout.sets {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            esc(&set.exercise),
            set.weight,
            set.reps,
            set.rep_range(),
        );
    }
    html.push_str("</table>");
    let _ = write!(html, r#"<p><a href="/ajax/workout/{}">Chart data</a></p>"#, workout.id);
    if data.editable {
        let _ = write!(
            html,
            r#"<section><h2>Edit</h2>{errors}<form method="post" action="{path}">{fields}<button type="submit">Save</button></form>
<form method="post" action="{path}/delete"><button type="submit">Delete workout</button></form></section>"#,
            errors = error_list(data.errors),
            path = workout.path(),
            fields = meta_fields(&data.edit_values),
        );
    }
    let _ = write!(
        html,
        "<section><h2>Recent workouts by {}</h2>{}</section>",
        esc(&data.owner.username),
        workout_list(data.recent.iter().map(|w| (w.clone(), None))),
    );
    html
}

/// Record-workout form. `value` looks up a previously submitted field.
pub fn record_workout<'a>(
    exercises: &[Exercise],
    values: &WorkoutValues<'_>,
    value: impl Fn(&str) -> &'a str,
    errors: &ValidationErrors,
) -> String {
    let mut rows = String::new();
    for i in 0..SET_ROWS {
        let exercise_field = format!("form-{i}-exercise");
        let chosen = value(&exercise_field);
        let mut options = String::from(r#"<option value="">Pick an exercise</option>"#);
        for e in exercises {
            let marker = if e.name == chosen { " selected" } else { "" };
            let _ = write!(options, r#"<option value="{}"{marker}>{}</option>"#, attr(&e.name), esc(&e.name));
        }
        let weight_field = format!("form-{i}-weight");
        let reps_field = format!("form-{i}-reps");
        let _ = write!(
            rows,
            r#"<tr><td><select name="{exercise_field}">{options}</select></td><td><input type="number" step="any" name="{weight_field}" value="{weight}"></td><td><input type="number" name="{reps_field}" value="{reps}"></td></tr>"#,
            weight = attr(value(&weight_field)),
            reps = attr(value(&reps_field)),
        );
    }
    format!(
        r#"{errors}<form method="post" action="/record-workout">
{meta}
<input type="hidden" name="form-TOTAL_FORMS" value="{SET_ROWS}">
<table><tr><th>Exercise</th><th>Weight</th><th>Reps</th></tr>{rows}</table>
<button type="submit">Save workout</button>
</form>"#,
        errors = error_list(errors),
        meta = meta_fields(values),
    )
}
