use std::fmt::Write as _;

use stronger_core::{BodyWeight, DailyNutrition, User, ValidationErrors, Workout};
use stronger_service::CalorieAverages;
use stronger_storage::UserCount;

use super::layout::{attr, error_list, esc, input, leaderboard};

/// Raw values of the nutrition form.
#[derive(Default)]
pub struct NutritionValues<'a> {
    pub date: String,
    pub calories: &'a str,
    pub protein: &'a str,
    pub carbs: &'a str,
    pub fats: &'a str,
}

pub struct NutritionNumbers {
    calories: String,
    protein: String,
    carbs: String,
    fats: String,
}

impl NutritionNumbers {
    pub fn from_record(record: &DailyNutrition) -> Self {
        Self {
            calories: record.calories.to_string(),
            protein: record.protein.to_string(),
            carbs: record.carbs.to_string(),
            fats: record.fats.to_string(),
        }
    }

    pub fn values(&self, date: String) -> NutritionValues<'_> {
        NutritionValues {
            date,
            calories: &self.calories,
            protein: &self.protein,
            carbs: &self.carbs,
            fats: &self.fats,
        }
    }
}

fn nutrition_form(action: &str, button: &str, values: &NutritionValues<'_>, errors: &ValidationErrors) -> String {
    format!(
        r#"{errors}<form method="post" action="{action}">
{date}
{calories}
{protein}
{carbs}
{fats}
<button type="submit">{button}</button>
</form>"#,
        errors = error_list(errors),
        action = attr(action),
        date = input("date", "Date", "date", &values.date),
        calories = input("calories", "Calories", "number", values.calories),
        protein = input("protein", "Protein (g)", "number", values.protein),
        carbs = input("carbs", "Carbs (g)", "number", values.carbs),
        fats = input("fats", "Fats (g)", "number", values.fats),
    )
}

fn bodyweight_form(date: &str, weight: &str, errors: &ValidationErrors) -> String {
    format!(
        r#"{errors}<form method="post" action="/nutrition/bodyweight">
{date}
{weight}
<button type="submit">Record weight</button>
</form>"#,
        errors = error_list(errors),
        date = input("date", "Date", "date", date),
        weight = input("bodyweight", "Bodyweight (kg)", "number", weight),
    )
}

fn record_row(record: &DailyNutrition, owner: Option<&str>) -> String {
    let by = owner
        .map(|u| format!(r#" by <a href="/users/{}/">{}</a>"#, attr(u), esc(u)))
        .unwrap_or_default();
    format!(
        r#"<li>{date} <a href="{path}">{kcal} kcal</a>{by}</li>"#,
        date = record.date,
        path = record.path(),
        kcal = record.calories,
    )
}

fn average(label: &str, kcal: Option<f64>) -> String {
    match kcal {
        Some(k) => format!("<p>Average on {label}: {k:.0} kcal</p>"),
        None => format!("<p>No records on {label} yet.</p>"),
    }
}

pub struct NutritionPage<'a> {
    pub bodyweights: &'a [BodyWeight],
    pub history: &'a [DailyNutrition],
    pub averages: CalorieAverages,
    pub most_nutrition: &'a [UserCount],
    pub friends: &'a [(DailyNutrition, String)],
    pub meal_values: NutritionValues<'a>,
    pub meal_errors: &'a ValidationErrors,
    pub weight_values: (&'a str, &'a str),
    pub weight_errors: &'a ValidationErrors,
}

pub fn nutrition(data: &NutritionPage<'_>) -> String {
    let mut weights = String::from("<ul>");
    for b in data.bodyweights {
        let _ = write!(weights, "<li>{}: {} kg</li>", b.date, b.weight);
    }
    weights.push_str("</ul>");
    let history: String = data.history.iter().map(|r| record_row(r, None)).collect();
    let friends: String = data.friends.iter().map(|(r, u)| record_row(r, Some(u))).collect();
    format!(
        r#"<p><a href="/ajax/nutrition-summary/?days-back=14">Two week summary</a></p>
{workout_avg}
{rest_avg}
<section><h2>Log a day</h2>{meal_form}</section>
<section><h2>Bodyweight</h2>{weight_form}{weights}</section>
<section><h2>Recent days</h2><ul>{history}</ul></section>
<section><h2>Friends</h2><ul>{friends}</ul></section>
<section><h2>Most records</h2>{leaders}</section>"#,
        workout_avg = average("workout days", data.averages.workout_days),
        rest_avg = average("rest days", data.averages.rest_days),
        meal_form = nutrition_form("/nutrition", "Save", &data.meal_values, data.meal_errors),
        weight_form = bodyweight_form(data.weight_values.0, data.weight_values.1, data.weight_errors),
        leaders = leaderboard(data.most_nutrition.iter().map(|r| (r.username.as_str(), r.count))),
    )
}

pub struct MealPage<'a> {
    pub record: &'a DailyNutrition,
    pub owner: &'a User,
    pub workouts: &'a [Workout],
    pub editable: bool,
    pub edit_values: NutritionValues<'a>,
    pub errors: &'a ValidationErrors,
}

pub fn meal(data: &MealPage<'_>) -> String {
    let r = data.record;
    let mut html = format!(
        r#"<p>{date} by <a href="{profile}">{owner}</a></p>
<table><tr><th>Calories</th><th>Protein</th><th>Carbs</th><th>Fats</th></tr>
<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr></table>"#,
        r.calories,
        r.protein,
        r.carbs,
        r.fats,
        date = r.date,
        profile = attr(&data.owner.profile_path()),
        owner = esc(&data.owner.username),
    );
    html.push_str("<section><h2>Workout that day</h2>");
    if data.workouts.is_empty() {
        html.push_str("<p>Rest day.</p>");
    }
    for w in data.workouts {
        let title = if w.description.is_empty() { "Workout" } else { &w.description };
        let _ = write!(html, r#"<p><a href="{}">{}</a></p>"#, w.path(), esc(title));
    }
    html.push_str("</section>");
    if data.editable {
        let _ = write!(
            html,
            r#"<section><h2>Edit</h2>{form}<form method="post" action="{path}/delete"><button type="submit">Delete</button></form></section>"#,
            form = nutrition_form(&r.path(), "Save", &data.edit_values, data.errors),
            path = r.path(),
        );
    }
    html
}
