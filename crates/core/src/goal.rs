use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationErrors;

/// A lifting target: move `weight` for `reps` on `exercise` by `objective_date`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
    pub objective_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
}

impl Goal {
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed_date.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GoalInput {
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
    pub objective_date: NaiveDate,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
}

impl GoalInput {
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.exercise.trim().is_empty() {
            errors.add("exercise", "This field is required.");
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            errors.add("weight", "Ensure this value is greater than 0.");
        }
        if self.reps == 0 {
            errors.add("reps", "Ensure this value is greater than or equal to 1.");
        }
        errors
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test code")]
mod tests {
    use super::*;

    #[test]
    fn completed_follows_completed_date() {
        let mut goal = Goal {
            id: 1,
            user_id: 1,
            exercise: "Squat".to_owned(),
            weight: 200.0,
            reps: 1,
            objective_date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
            completed_date: None,
        };
        assert!(!goal.completed());
        goal.completed_date = NaiveDate::from_ymd_opt(2014, 12, 1);
        assert!(goal.completed());
    }

    #[test]
    fn input_rejects_zero_reps() {
        let input: GoalInput = serde_json::from_str(
            r#"{"exercise":"Squat","weight":100.0,"reps":0,"objective_date":"2015-01-01"}"#,
        )
        .unwrap();
        assert!(input.validate().for_field("reps").is_some());
    }
}
