use std::collections::BTreeMap;
use std::fmt::Write as _;

use stronger_core::analytics::StrengthTotal;
use stronger_core::{Exercise, Muscle, ValidationErrors, Workout};

use super::layout::{attr, error_list, esc, input, select};

/// Raw values of the add/edit exercise form.
pub struct ExerciseValues<'a> {
    pub name: &'a str,
    pub primary: &'a str,
    pub secondary: &'a str,
}

impl<'a> ExerciseValues<'a> {
    pub const EMPTY: ExerciseValues<'static> = ExerciseValues { name: "", primary: "", secondary: "" };

    pub fn from_exercise(exercise: &'a Exercise) -> Self {
        Self { name: &exercise.name, primary: exercise.primary.as_str(), secondary: exercise.secondary.as_str() }
    }
}

fn exercise_form(action: &str, button: &str, values: &ExerciseValues<'_>, errors: &ValidationErrors) -> String {
    let muscles = || Muscle::ALL.iter().map(|m| (m.as_str(), m.as_str()));
    format!(
        r#"{errors}<form method="post" action="{action}">
{name}
{primary}
{secondary}
<button type="submit">{button}</button>
</form>"#,
        errors = error_list(errors),
        action = attr(action),
        name = input("name", "Name", "text", values.name),
        primary = select("primary", "Primary muscle", muscles(), values.primary),
        secondary = select("secondary", "Secondary muscle", muscles(), values.secondary),
    )
}

fn totals_table(totals: &[StrengthTotal]) -> String {
    if totals.is_empty() {
        return "<p>No big three lifts recorded yet.</p>".to_owned();
    }
    let mut html = String::from(
        "<table><tr><th>User</th><th>Total</th><th>Squat</th><th>Deadlift</th><th>Bench</th></tr>",
    );
    for t in totals {
        let _ = write!(
            html,
            r#"<tr><td><a href="/users/{}/">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            attr(&t.username),
            esc(&t.username),
            t.total,
            t.squat,
            t.deadlift,
            t.bench,
        );
    }
    html.push_str("</table>");
    html
}

fn exercise_links<'a>(exercises: impl IntoIterator<Item = &'a Exercise>) -> String {
    let mut html = String::from("<ul>");
    for e in exercises {
        let _ = write!(html, r#"<li><a href="{}">{}</a></li>"#, attr(&e.path()), esc(&e.name));
    }
    html.push_str("</ul>");
    html
}

pub struct ExercisesPage<'a> {
    pub categorised: &'a BTreeMap<Muscle, Vec<Exercise>>,
    pub count: u64,
    pub recent: &'a [Exercise],
    pub biggest_totals: &'a [StrengthTotal],
    pub friend_totals: &'a [StrengthTotal],
    pub add_values: ExerciseValues<'a>,
    pub errors: &'a ValidationErrors,
}

pub fn exercises(data: &ExercisesPage<'_>) -> String {
    let mut catalog = String::new();
    for (muscle, group) in data.categorised {
        let _ = write!(catalog, "<h3>{muscle}</h3>{}", exercise_links(group));
    }
    format!(
        r#"<form method="get" action="/exercises"><label>Find an exercise <input type="text" name="name"></label><button type="submit">Go</button></form>
<p>{count} exercises. <a href="/ajax/popular-exercises">Most popular</a></p>
<section><h2>Recently added</h2>{recent}</section>
<section><h2>Biggest totals</h2>{biggest}</section>
<section><h2>Friends' totals</h2>{friends}</section>
<section><h2>All exercises</h2>{catalog}</section>
<section><h2>Add an exercise</h2>{form}</section>"#,
        count = data.count,
        recent = exercise_links(data.recent),
        biggest = totals_table(data.biggest_totals),
        friends = totals_table(data.friend_totals),
        form = exercise_form("/exercises", "Add exercise", &data.add_values, data.errors),
    )
}

pub struct ExercisePage<'a> {
    pub exercise: &'a Exercise,
    pub total_reps: u64,
    pub workouts: &'a [Workout],
    pub edit_values: ExerciseValues<'a>,
    pub errors: &'a ValidationErrors,
}

pub fn exercise(data: &ExercisePage<'_>) -> String {
    let exercise = data.exercise;
    let mut workouts = String::from("<ul>");
    for w in data.workouts {
        let _ = write!(workouts, r#"<li><a href="{}">{}</a></li>"#, w.path(), w.date);
    }
    workouts.push_str("</ul>");
    format!(
        r#"<p>Primary muscle: {primary}. Secondary muscle: {secondary}.</p>
<p>You have lifted {reps} reps of {name}.</p>
<p><a href="/ajax/exercises/{clean}?reps=5">Records and progression</a></p>
<section><h2>Your workouts with this exercise</h2>{workouts}</section>
<section><h2>Edit</h2>{form}</section>"#,
        primary = exercise.primary,
        secondary = exercise.secondary,
        reps = data.total_reps,
        name = esc(&exercise.name),
        clean = attr(&exercise.clean_name),
        form = exercise_form(&exercise.path(), "Save", &data.edit_values, data.errors),
    )
}
