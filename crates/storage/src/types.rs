//! Storage types shared across modules

use chrono::NaiveDate;
use serde::Serialize;

/// Row counts across the whole site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SiteStats {
    pub users: u64,
    pub workouts: u64,
    pub sets: u64,
    pub exercises: u64,
    pub nutrition_records: u64,
    pub bodyweights: u64,
    pub groups: u64,
}

/// A user and how many rows of some kind they own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCount {
    pub user_id: i64,
    pub username: String,
    pub count: u64,
}

/// An exercise and how many sets have been logged for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseCount {
    pub name: String,
    pub sets: u64,
}

/// Filter for joined set rows. Unset fields do not restrict the query.
#[derive(Debug, Clone, Default)]
pub struct SetFilter {
    pub workout_id: Option<i64>,
    pub user_id: Option<i64>,
    /// Restrict to sets owned by any of these users. An empty list matches
    /// nothing.
    pub user_ids: Option<Vec<i64>>,
    pub clean_names: Option<Vec<String>>,
    pub reps: Option<u32>,
    /// Inclusive lower bound on the workout date.
    pub since: Option<NaiveDate>,
    /// Inclusive upper bound on the workout date.
    pub until: Option<NaiveDate>,
}

impl SetFilter {
    #[must_use]
    pub fn workout(workout_id: i64) -> Self {
        Self { workout_id: Some(workout_id), ..Self::default() }
    }

    #[must_use]
    pub fn exercise(clean_name: &str) -> Self {
        Self { clean_names: Some(vec![clean_name.to_owned()]), ..Self::default() }
    }

    #[must_use]
    pub fn for_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }
}
