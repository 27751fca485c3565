use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_SETS_PER_WORKOUT;
use crate::exercise::Muscle;
use crate::validation::{ValidationErrors, check_max_len, parse_date, parse_number};

pub const WORKOUT_TEXT_MAX_LEN: usize = 100;

/// A training session on one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workout {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub comments: String,
}

impl Workout {
    #[must_use]
    pub fn path(&self) -> String {
        format!("/workouts/{}", self.id)
    }
}

/// Band a set falls into by repetition count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RepRange {
    Strength,
    Hypertrophy,
    Endurance,
}

impl RepRange {
    pub const ALL: [Self; 3] = [Self::Strength, Self::Hypertrophy, Self::Endurance];

    #[must_use]
    pub const fn from_reps(reps: u32) -> Self {
        match reps {
            0..=5 => Self::Strength,
            6..=12 => Self::Hypertrophy,
            _ => Self::Endurance,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Strength => "strength",
            Self::Hypertrophy => "hypertrophy",
            Self::Endurance => "endurance",
        }
    }
}

impl fmt::Display for RepRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One performed set as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSet {
    pub id: i64,
    pub workout_id: i64,
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
}

impl WorkoutSet {
    #[must_use]
    pub const fn rep_range(&self) -> RepRange {
        RepRange::from_reps(self.reps)
    }
}

/// A set joined with its workout, owner and exercise. Analytics run over
/// slices of these.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SetDetail {
    pub set_id: i64,
    pub workout_id: i64,
    pub user_id: i64,
    pub username: String,
    pub date: NaiveDate,
    pub exercise: String,
    pub clean_name: String,
    pub primary: Muscle,
    pub weight: f64,
    pub reps: u32,
}

impl SetDetail {
    #[must_use]
    pub const fn rep_range(&self) -> RepRange {
        RepRange::from_reps(self.reps)
    }
}

/// A workout with its ordered sets, the shape the REST API returns.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkoutWithSets {
    #[serde(flatten)]
    pub workout: Workout,
    pub sets: Vec<WorkoutSet>,
}

/// Validated workout header fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkoutInput {
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub comments: String,
}

impl WorkoutInput {
    pub fn from_fields(
        date: &str,
        description: &str,
        comments: &str,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let date = parse_date("date", date, &mut errors);
        let input_description = description.trim().to_owned();
        let input_comments = comments.trim().to_owned();
        match date {
            Some(date) => {
                let input =
                    Self { date, description: input_description, comments: input_comments };
                errors.extend(input.validate());
                errors.finish(input)
            },
            None => Err(errors),
        }
    }

    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_max_len("description", &self.description, WORKOUT_TEXT_MAX_LEN, &mut errors);
        check_max_len("comments", &self.comments, WORKOUT_TEXT_MAX_LEN, &mut errors);
        errors
    }
}

/// One set row of a submission. The exercise is referenced by name.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SetInput {
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
}

impl SetInput {
    /// Parse a formset submission: `form-TOTAL_FORMS` rows of
    /// `form-N-exercise`, `form-N-weight` and `form-N-reps`. Rows with a
    /// blank exercise are skipped.
    pub fn parse_formset(fields: &[(String, String)]) -> Result<Vec<Self>, ValidationErrors> {
        let lookup = |key: &str| field_value(fields, key);
        let mut errors = ValidationErrors::new();
        let total: usize = match lookup("form-TOTAL_FORMS").trim().parse() {
            Ok(n) => n,
            Err(_) => {
                return Err(ValidationErrors::single(
                    "form-TOTAL_FORMS",
                    "ManagementForm data is missing or has been tampered with.",
                ));
            },
        };
        if total > MAX_SETS_PER_WORKOUT {
            return Err(ValidationErrors::single(
                "form-TOTAL_FORMS",
                format!("Please submit {MAX_SETS_PER_WORKOUT} or fewer sets."),
            ));
        }

        let mut sets = Vec::with_capacity(total);
        for i in 0..total {
            let exercise = lookup(&format!("form-{i}-exercise")).trim();
            if exercise.is_empty() {
                continue;
            }
            let weight_field = format!("form-{i}-weight");
            let reps_field = format!("form-{i}-reps");
            let weight: Option<f64> =
                parse_number(&weight_field, lookup(&weight_field), &mut errors);
            let reps: Option<u32> = parse_number(&reps_field, lookup(&reps_field), &mut errors);
            if weight.is_some_and(|w| !w.is_finite() || w < 0.0) {
                errors.add(&weight_field, "Weight must be zero or more.");
            }
            if reps == Some(0) {
                errors.add(&reps_field, "Ensure this value is greater than or equal to 1.");
            }
            if let (Some(weight), Some(reps)) = (weight, reps) {
                sets.push(Self { exercise: exercise.to_owned(), weight, reps });
            }
        }
        errors.finish(sets)
    }

    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.exercise.trim().is_empty() {
            errors.add("exercise", "This field is required.");
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            errors.add("weight", "Weight must be zero or more.");
        }
        if self.reps == 0 {
            errors.add("reps", "Ensure this value is greater than or equal to 1.");
        }
        errors
    }
}

/// Value of a submitted form field, or `""` when absent.
#[must_use]
pub fn field_value<'a>(fields: &'a [(String, String)], key: &str) -> &'a str {
    fields.iter().find(|(k, _)| k == key).map_or("", |(_, v)| v.as_str())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test code")]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn rep_range_boundaries() {
        assert_eq!(RepRange::from_reps(1), RepRange::Strength);
        assert_eq!(RepRange::from_reps(5), RepRange::Strength);
        assert_eq!(RepRange::from_reps(6), RepRange::Hypertrophy);
        assert_eq!(RepRange::from_reps(12), RepRange::Hypertrophy);
        assert_eq!(RepRange::from_reps(13), RepRange::Endurance);
    }

    #[test]
    fn formset_skips_blank_exercise_rows() {
        let form = fields(&[
            ("form-TOTAL_FORMS", "3"),
            ("form-0-exercise", "Squat"),
            ("form-0-weight", "100"),
            ("form-0-reps", "5"),
            ("form-1-exercise", ""),
            ("form-2-exercise", "Bench"),
            ("form-2-weight", "80.5"),
            ("form-2-reps", "8"),
        ]);
        let sets = SetInput::parse_formset(&form).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[1].exercise, "Bench");
        assert!((sets[1].weight - 80.5).abs() < f64::EPSILON);
    }

    #[test]
    fn formset_reports_row_errors() {
        let form = fields(&[
            ("form-TOTAL_FORMS", "1"),
            ("form-0-exercise", "Squat"),
            ("form-0-weight", "heavy"),
            ("form-0-reps", "0"),
        ]);
        let errors = SetInput::parse_formset(&form).unwrap_err();
        assert_eq!(errors.for_field("form-0-weight"), Some("Enter a valid number."));
        assert!(errors.for_field("form-0-reps").is_some());
    }

    #[test]
    fn formset_requires_management_field() {
        let errors = SetInput::parse_formset(&[]).unwrap_err();
        assert!(errors.for_field("form-TOTAL_FORMS").is_some());
    }

    #[test]
    fn workout_input_requires_date() {
        let errors = WorkoutInput::from_fields("", "legs", "").unwrap_err();
        assert_eq!(errors.for_field("date"), Some("This field is required."));
        let ok = WorkoutInput::from_fields("2014-06-30", "legs", "felt good").unwrap();
        assert_eq!(ok.date, NaiveDate::from_ymd_opt(2014, 6, 30).unwrap());
    }
}
