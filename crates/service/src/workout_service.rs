use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use stronger_core::analytics::{
    RepRangeCounts, WorkoutCharts, muscles_targeted, rep_ranges, workouts_per_month,
};
use stronger_core::constants::WORKOUT_HISTORY_DAYS;
use stronger_core::{
    Muscle, SetInput, ValidationErrors, Workout, WorkoutInput, WorkoutWithSets,
};
use stronger_storage::{SetFilter, Storage, StorageError, UserCount};

use crate::blocking::{blocking, delegate};
use crate::ensure_owner;
use crate::error::{Result, ServiceError};

/// Monthly workout counts, Jan..Dec, for one user and the whole site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AverageWorkoutCount {
    pub user_average: [u32; 12],
    pub site_average: [u32; 12],
}

/// Data behind the charts on the workouts page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutsSummary {
    #[serde(rename = "week-rep-ranges")]
    pub rep_ranges: RepRangeCounts,
    #[serde(rename = "week-muscle-groups")]
    pub muscle_groups: BTreeMap<Muscle, u32>,
    #[serde(rename = "average-workout-count")]
    pub average_workout_count: AverageWorkoutCount,
}

#[derive(Clone)]
pub struct WorkoutService {
    storage: Storage,
}

impl WorkoutService {
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Save a workout with its sets. An unknown exercise is reported as a
    /// validation message rather than a storage failure.
    pub async fn record_workout(
        &self,
        user_id: i64,
        input: &WorkoutInput,
        sets: &[SetInput],
    ) -> Result<WorkoutWithSets> {
        let mut errors = input.validate();
        for set in sets {
            errors.extend(set.validate());
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }
        let storage = self.storage.clone();
        let input = input.clone();
        let sets = sets.to_vec();
        blocking(move || match storage.create_workout(user_id, &input, &sets) {
            Err(StorageError::InvalidReference(msg)) => {
                Err(ServiceError::Validation(ValidationErrors::single("exercise", msg)))
            },
            other => other.map_err(ServiceError::from),
        })
        .await
    }

    pub async fn get_workout(&self, id: i64) -> Result<Workout> {
        delegate!(self, get_workout, @val id)
    }

    pub async fn workout_with_sets(&self, id: i64) -> Result<WorkoutWithSets> {
        delegate!(self, get_workout_with_sets, @val id)
    }

    pub async fn edit_workout(&self, actor_id: i64, id: i64, input: &WorkoutInput) -> Result<Workout> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(errors.into());
        }
        let workout = self.get_workout(id).await?;
        ensure_owner(actor_id, workout.user_id, "workout")?;
        delegate!(self, update_workout, @val id, @ref input)
    }

    pub async fn delete_workout(&self, actor_id: i64, id: i64) -> Result<bool> {
        let workout = self.get_workout(id).await?;
        ensure_owner(actor_id, workout.user_id, "workout")?;
        delegate!(self, delete_workout, @val id)
    }

    pub async fn list_workouts(&self, user_id: Option<i64>, limit: usize) -> Result<Vec<Workout>> {
        delegate!(self, list_workouts, @val user_id, @val limit)
    }

    pub async fn list_workouts_with_sets(
        &self,
        user_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<WorkoutWithSets>> {
        let storage = self.storage.clone();
        blocking(move || -> std::result::Result<_, StorageError> {
            storage
                .list_workouts(user_id, limit)?
                .into_iter()
                .map(|w| {
                    let sets = storage.workout_sets(w.id)?;
                    Ok(WorkoutWithSets { workout: w, sets })
                })
                .collect()
        })
        .await
    }

    /// Newest workouts of the users `user_id` follows.
    pub async fn friend_workouts(&self, user_id: i64, limit: usize) -> Result<Vec<(Workout, String)>> {
        let storage = self.storage.clone();
        blocking(move || {
            let following = storage.following_ids(user_id)?;
            storage.workouts_for_users(&following, limit)
        })
        .await
    }

    pub async fn workouts_on(&self, user_id: i64, date: NaiveDate) -> Result<Vec<Workout>> {
        delegate!(self, workouts_on, @val user_id, @val date)
    }

    pub async fn workout_dates(&self, user_id: Option<i64>) -> Result<Vec<NaiveDate>> {
        delegate!(self, workout_dates, @val user_id)
    }

    pub async fn most_frequent_users(&self, limit: usize) -> Result<Vec<UserCount>> {
        delegate!(self, most_frequent_workout_users, @val limit)
    }

    pub async fn workouts_including_exercise(
        &self,
        clean_name: &str,
        user_id: Option<i64>,
    ) -> Result<Vec<Workout>> {
        delegate!(self, workouts_including_exercise, @str clean_name, @val user_id)
    }

    /// Workouts per calendar month over the last year, Jan..Dec.
    pub async fn workouts_per_month(&self, user_id: Option<i64>, today: NaiveDate) -> Result<[u32; 12]> {
        let dates = self.workout_dates(user_id).await?;
        Ok(workouts_per_month(&dates, today, WORKOUT_HISTORY_DAYS))
    }

    /// Chart data for one workout.
    pub async fn workout_charts(&self, id: i64) -> Result<WorkoutCharts> {
        let storage = self.storage.clone();
        blocking(move || {
            storage.get_workout(id)?;
            let sets = storage.set_details(&SetFilter::workout(id))?;
            Ok::<_, StorageError>(WorkoutCharts::from_sets(&sets))
        })
        .await
    }

    /// Rep ranges and muscles over the user's last `days_back` days, plus
    /// monthly workout counts for the user and the site.
    pub async fn workouts_summary(
        &self,
        user_id: i64,
        days_back: i64,
        today: NaiveDate,
    ) -> Result<WorkoutsSummary> {
        let filter = SetFilter {
            since: Some(today - Duration::days(days_back)),
            until: Some(today),
            ..SetFilter::default()
        }
        .for_user(user_id);
        let sets = delegate!(self, set_details, @ref filter)?;
        Ok(WorkoutsSummary {
            rep_ranges: rep_ranges(&sets),
            muscle_groups: muscles_targeted(&sets),
            average_workout_count: AverageWorkoutCount {
                user_average: self.workouts_per_month(Some(user_id), today).await?,
                site_average: self.workouts_per_month(None, today).await?,
            },
        })
    }
}
