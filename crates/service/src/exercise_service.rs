use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use stronger_core::analytics::{
    ExerciseRecords, StrengthTotal, big_three_progress, biggest_totals, exercise_records,
    progression,
};
use stronger_core::{
    BIG_THREE, Exercise, ExerciseInput, Goal, GoalInput, Muscle, ValidationErrors, categorise,
};
use stronger_storage::{ExerciseCount, SetFilter, Storage, StorageError};

use crate::blocking::{blocking, delegate};
use crate::ensure_owner;
use crate::error::{Result, ServiceError};

/// Records and progression for the exercise chart endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseHistory {
    #[serde(rename = "exercise-records")]
    pub records: ExerciseRecords,
    #[serde(rename = "exercise-progress")]
    pub progress: BTreeMap<NaiveDate, f64>,
}

const DUPLICATE_EXERCISE: &str = "Exercise with this Name already exists.";

#[derive(Clone)]
pub struct ExerciseService {
    storage: Storage,
}

impl ExerciseService {
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn add_exercise(&self, added_by: i64, input: &ExerciseInput) -> Result<Exercise> {
        let storage = self.storage.clone();
        let input = input.clone();
        blocking(move || {
            storage
                .create_exercise(&input, Some(added_by))
                .map_err(|e| ServiceError::from(e).duplicate_as_field("name", DUPLICATE_EXERCISE))
        })
        .await
    }

    /// Rename or re-muscle an exercise. The clean name is recomputed.
    pub async fn edit_exercise(&self, clean_name: &str, input: &ExerciseInput) -> Result<Exercise> {
        let storage = self.storage.clone();
        let clean_name = clean_name.to_owned();
        let input = input.clone();
        blocking(move || {
            storage
                .update_exercise(&clean_name, &input)
                .map_err(|e| ServiceError::from(e).duplicate_as_field("name", DUPLICATE_EXERCISE))
        })
        .await
    }

    /// Remove an exercise. Only the user who added it may do this; seeded
    /// exercises with no author can be removed by anyone.
    pub async fn delete_exercise(&self, actor_id: i64, clean_name: &str) -> Result<bool> {
        let exercise = self.get_exercise(clean_name).await?;
        if let Some(owner) = exercise.added_by {
            ensure_owner(actor_id, owner, "exercise")?;
        }
        delegate!(self, delete_exercise, @str clean_name)
    }

    pub async fn get_exercise(&self, clean_name: &str) -> Result<Exercise> {
        delegate!(self, get_exercise, @str clean_name)
    }

    pub async fn get_exercise_by_name(&self, name: &str) -> Result<Exercise> {
        delegate!(self, get_exercise_by_name, @str name)
    }

    pub async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        delegate!(self, list_exercises)
    }

    pub async fn count_exercises(&self) -> Result<u64> {
        delegate!(self, count_exercises)
    }

    pub async fn recently_added(&self, limit: usize) -> Result<Vec<Exercise>> {
        delegate!(self, recently_added_exercises, @val limit)
    }

    /// Catalog grouped by primary muscle, owned for templating.
    pub async fn categorise_exercises(&self) -> Result<BTreeMap<Muscle, Vec<Exercise>>> {
        let exercises = self.list_exercises().await?;
        Ok(categorise(&exercises)
            .into_iter()
            .map(|(muscle, group)| (muscle, group.into_iter().cloned().collect()))
            .collect())
    }

    pub async fn most_popular(&self, limit: usize) -> Result<Vec<ExerciseCount>> {
        delegate!(self, most_popular_exercises, @val limit)
    }

    pub async fn sum_reps(&self, clean_name: &str, user_id: i64, since: Option<NaiveDate>) -> Result<u64> {
        delegate!(self, sum_reps, @str clean_name, @val user_id, @val since)
    }

    /// Personal (when `user_id` is given) and site records, plus the user's
    /// progression at `reps`.
    pub async fn exercise_history(
        &self,
        clean_name: &str,
        user_id: Option<i64>,
        reps: u32,
    ) -> Result<ExerciseHistory> {
        let storage = self.storage.clone();
        let clean_name = clean_name.to_owned();
        blocking(move || {
            storage.get_exercise(&clean_name)?;
            let all_sets = storage.set_details(&SetFilter::exercise(&clean_name))?;
            let user_sets: Vec<_> = match user_id {
                Some(id) => all_sets.iter().filter(|s| s.user_id == id).cloned().collect(),
                None => Vec::new(),
            };
            Ok::<_, StorageError>(ExerciseHistory {
                records: exercise_records(&user_sets, &all_sets),
                progress: progression(&user_sets, reps),
            })
        })
        .await
    }

    /// Heaviest lift per date for each of the big three.
    pub async fn big_three_progress(
        &self,
        username: &str,
    ) -> Result<BTreeMap<&'static str, BTreeMap<NaiveDate, f64>>> {
        let storage = self.storage.clone();
        let username = username.to_owned();
        blocking(move || {
            let user = storage.get_user_by_username(&username)?;
            let filter = SetFilter {
                clean_names: Some(BIG_THREE.iter().map(|s| (*s).to_owned()).collect()),
                ..SetFilter::default()
            }
            .for_user(user.id);
            let sets = storage.set_details(&filter)?;
            Ok::<_, StorageError>(big_three_progress(&sets))
        })
        .await
    }

    /// Squat + deadlift + bench leaderboard, optionally restricted to a set
    /// of users.
    pub async fn biggest_totals(&self, user_ids: Option<Vec<i64>>) -> Result<Vec<StrengthTotal>> {
        let filter = SetFilter {
            user_ids,
            clean_names: Some(BIG_THREE.iter().map(|s| (*s).to_owned()).collect()),
            ..SetFilter::default()
        };
        let sets = delegate!(self, set_details, @ref filter)?;
        Ok(biggest_totals(&sets))
    }

    /// Leaderboard among the users `user_id` follows, plus themselves.
    pub async fn friend_totals(&self, user_id: i64) -> Result<Vec<StrengthTotal>> {
        let mut ids = delegate!(self, following_ids, @val user_id)?;
        ids.push(user_id);
        self.biggest_totals(Some(ids)).await
    }

    pub async fn create_goal(&self, user_id: i64, input: &GoalInput) -> Result<Goal> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(errors.into());
        }
        let storage = self.storage.clone();
        let input = input.clone();
        blocking(move || match storage.create_goal(user_id, &input) {
            Err(StorageError::InvalidReference(_)) => Err(ServiceError::Validation(
                ValidationErrors::single("exercise", "Select a valid choice."),
            )),
            other => other.map_err(ServiceError::from),
        })
        .await
    }

    pub async fn get_goal(&self, id: i64) -> Result<Goal> {
        delegate!(self, get_goal, @val id)
    }

    pub async fn list_goals(&self, user_id: Option<i64>) -> Result<Vec<Goal>> {
        delegate!(self, list_goals, @val user_id)
    }

    pub async fn update_goal(&self, actor_id: i64, id: i64, input: &GoalInput) -> Result<Goal> {
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(errors.into());
        }
        let goal = self.get_goal(id).await?;
        ensure_owner(actor_id, goal.user_id, "goal")?;
        delegate!(self, update_goal, @val id, @ref input)
    }

    pub async fn delete_goal(&self, actor_id: i64, id: i64) -> Result<bool> {
        let goal = self.get_goal(id).await?;
        ensure_owner(actor_id, goal.user_id, "goal")?;
        delegate!(self, delete_goal, @val id)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test code")]
mod tests {
    use stronger_core::{SetInput, WorkoutInput};
    use tempfile::TempDir;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 3, d).unwrap()
    }

    fn exercise(name: &str, primary: Muscle) -> ExerciseInput {
        ExerciseInput { name: name.to_owned(), primary, secondary: Muscle::Abs }
    }

    fn setup() -> (ExerciseService, Storage, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(&dir.path().join("test.db")).unwrap();
        storage.create_user("alice", "a@example.com", "x").unwrap();
        storage.create_user("bob", "b@example.com", "x").unwrap();
        (ExerciseService::new(storage.clone()), storage, dir)
    }

    fn lift(storage: &Storage, user_id: i64, d: u32, sets: &[(&str, f64, u32)]) {
        let input = WorkoutInput { date: day(d), description: String::new(), comments: String::new() };
        let sets: Vec<SetInput> = sets
            .iter()
            .map(|(name, weight, reps)| SetInput { exercise: (*name).to_owned(), weight: *weight, reps: *reps })
            .collect();
        storage.create_workout(user_id, &input, &sets).unwrap();
    }

    #[tokio::test]
    async fn duplicate_exercise_is_name_error() {
        let (service, _storage, _dir) = setup();
        service.add_exercise(1, &exercise("Squat", Muscle::Quads)).await.unwrap();

        let err = service.add_exercise(2, &exercise("Squat", Muscle::Quads)).await.unwrap_err();
        let ServiceError::Validation(errors) = err else { panic!("expected validation error") };
        assert_eq!(errors.for_field("name"), Some(DUPLICATE_EXERCISE));
    }

    #[tokio::test]
    async fn history_splits_personal_and_site_records() {
        let (service, storage, _dir) = setup();
        service.add_exercise(1, &exercise("Squat", Muscle::Quads)).await.unwrap();
        lift(&storage, 1, 1, &[("Squat", 100.0, 5)]);
        lift(&storage, 1, 8, &[("Squat", 110.0, 5)]);
        lift(&storage, 2, 8, &[("Squat", 150.0, 5)]);

        let history = service.exercise_history("squat", Some(1), 5).await.unwrap();
        assert_eq!(history.progress.len(), 2);
        assert_eq!(history.records.personal_records[&5], (110.0, Some("alice".to_owned())));
        assert_eq!(history.records.site_records[&5], (150.0, Some("bob".to_owned())));

        let anonymous = service.exercise_history("squat", None, 5).await.unwrap();
        assert_eq!(anonymous.records.personal_records[&5], (0.0, None));
        assert!(anonymous.progress.is_empty());
        assert!(service.exercise_history("zercher", None, 5).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn friend_totals_include_self() {
        let (service, storage, _dir) = setup();
        for (name, muscle) in [("Squat", Muscle::Quads), ("Deadlift", Muscle::Back), ("Bench", Muscle::Chest)] {
            service.add_exercise(1, &exercise(name, muscle)).await.unwrap();
        }
        lift(&storage, 1, 1, &[("Squat", 100.0, 1), ("Deadlift", 120.0, 1), ("Bench", 80.0, 1)]);
        lift(&storage, 2, 1, &[("Squat", 200.0, 1), ("Deadlift", 220.0, 1), ("Bench", 150.0, 1)]);

        let alone = service.friend_totals(1).await.unwrap();
        assert_eq!(alone.len(), 1);
        assert_eq!(alone[0].username, "alice");

        storage.follow(1, 2).unwrap();
        let totals = service.friend_totals(1).await.unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].username, "bob");
    }

    #[tokio::test]
    async fn goal_for_unknown_exercise_is_field_error() {
        let (service, _storage, _dir) = setup();
        let input = GoalInput {
            exercise: "Zercher".to_owned(),
            weight: 100.0,
            reps: 1,
            objective_date: day(20),
            completed_date: None,
        };

        let err = service.create_goal(1, &input).await.unwrap_err();
        let ServiceError::Validation(errors) = err else { panic!("expected validation error") };
        assert!(errors.for_field("exercise").is_some());
    }
}
