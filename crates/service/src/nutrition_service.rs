use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use stronger_core::analytics::{DayKind, NutritionSummary, average_calories, nutrition_summary};
use stronger_core::{BodyWeight, BodyWeightInput, DailyNutrition, NutritionInput};
use stronger_storage::{Storage, StorageError, UserCount};

use crate::blocking::{blocking, delegate};
use crate::ensure_owner;
use crate::error::{Result, ServiceError};

/// Mean calories on workout days and on rest days. `None` when the user has
/// no record on that kind of day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalorieAverages {
    pub workout_days: Option<f64>,
    pub rest_days: Option<f64>,
}

const DUPLICATE_BODYWEIGHT: &str = "You have already recorded your bodyweight for this date.";

#[derive(Clone)]
pub struct NutritionService {
    storage: Storage,
}

impl NutritionService {
    #[must_use]
    pub const fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub async fn record_nutrition(&self, user_id: i64, input: &NutritionInput) -> Result<DailyNutrition> {
        delegate!(self, create_nutrition, @val user_id, @copy input)
    }

    pub async fn get_nutrition(&self, id: i64) -> Result<DailyNutrition> {
        delegate!(self, get_nutrition, @val id)
    }

    pub async fn edit_nutrition(
        &self,
        actor_id: i64,
        id: i64,
        input: &NutritionInput,
    ) -> Result<DailyNutrition> {
        let record = self.get_nutrition(id).await?;
        ensure_owner(actor_id, record.user_id, "nutrition record")?;
        delegate!(self, update_nutrition, @val id, @copy input)
    }

    pub async fn delete_nutrition(&self, actor_id: i64, id: i64) -> Result<bool> {
        let record = self.get_nutrition(id).await?;
        ensure_owner(actor_id, record.user_id, "nutrition record")?;
        delegate!(self, delete_nutrition, @val id)
    }

    pub async fn list_nutrition(&self, user_id: Option<i64>, limit: usize) -> Result<Vec<DailyNutrition>> {
        delegate!(self, list_nutrition, @val user_id, @val limit)
    }

    pub async fn nutrition_on(&self, user_id: i64, date: NaiveDate) -> Result<Vec<DailyNutrition>> {
        delegate!(self, nutrition_on, @val user_id, @val date)
    }

    /// Newest records of the users `user_id` follows.
    pub async fn friend_nutrition(
        &self,
        user_id: i64,
        limit: usize,
    ) -> Result<Vec<(DailyNutrition, String)>> {
        let storage = self.storage.clone();
        blocking(move || {
            let following = storage.following_ids(user_id)?;
            storage.nutrition_for_users(&following, limit)
        })
        .await
    }

    pub async fn most_frequent_users(&self, limit: usize) -> Result<Vec<UserCount>> {
        delegate!(self, most_frequent_nutrition_users, @val limit)
    }

    pub async fn average_calories(&self, user_id: i64) -> Result<CalorieAverages> {
        let storage = self.storage.clone();
        blocking(move || {
            let records = storage.nutrition_between(user_id, None, None)?;
            let dates: BTreeSet<NaiveDate> = storage.workout_dates(Some(user_id))?.into_iter().collect();
            Ok::<_, StorageError>(CalorieAverages {
                workout_days: average_calories(&records, &dates, DayKind::Workout),
                rest_days: average_calories(&records, &dates, DayKind::Rest),
            })
        })
        .await
    }

    /// Calorie and macro charts over the last `days_back` days.
    pub async fn nutrition_summary(
        &self,
        user_id: i64,
        days_back: i64,
        today: NaiveDate,
    ) -> Result<NutritionSummary> {
        let storage = self.storage.clone();
        let start = today - Duration::days(days_back);
        blocking(move || {
            let records = storage.nutrition_between(user_id, Some(start), Some(today))?;
            let dates: BTreeSet<NaiveDate> = storage.workout_dates(Some(user_id))?.into_iter().collect();
            Ok::<_, StorageError>(nutrition_summary(&records, &dates))
        })
        .await
    }

    /// Record a weigh-in. A second entry on the same date is a field error.
    pub async fn record_bodyweight(&self, user_id: i64, input: &BodyWeightInput) -> Result<BodyWeight> {
        let storage = self.storage.clone();
        let input = *input;
        blocking(move || {
            storage.create_bodyweight(user_id, &input).map_err(|e| {
                ServiceError::from(e).duplicate_as_field("date", DUPLICATE_BODYWEIGHT)
            })
        })
        .await
    }

    pub async fn get_bodyweight(&self, id: i64) -> Result<BodyWeight> {
        delegate!(self, get_bodyweight, @val id)
    }

    pub async fn edit_bodyweight(
        &self,
        actor_id: i64,
        id: i64,
        input: &BodyWeightInput,
    ) -> Result<BodyWeight> {
        let record = self.get_bodyweight(id).await?;
        ensure_owner(actor_id, record.user_id, "bodyweight")?;
        let storage = self.storage.clone();
        let input = *input;
        blocking(move || {
            storage.update_bodyweight(id, &input).map_err(|e| {
                ServiceError::from(e).duplicate_as_field("date", DUPLICATE_BODYWEIGHT)
            })
        })
        .await
    }

    pub async fn delete_bodyweight(&self, actor_id: i64, id: i64) -> Result<bool> {
        let record = self.get_bodyweight(id).await?;
        ensure_owner(actor_id, record.user_id, "bodyweight")?;
        delegate!(self, delete_bodyweight, @val id)
    }

    pub async fn list_bodyweights(&self, user_id: Option<i64>, limit: usize) -> Result<Vec<BodyWeight>> {
        delegate!(self, list_bodyweights, @val user_id, @val limit)
    }

    pub async fn current_bodyweight(&self, user_id: i64) -> Result<Option<BodyWeight>> {
        delegate!(self, current_bodyweight, @val user_id)
    }

    pub async fn bodyweight_history(&self, user_id: i64) -> Result<Vec<BodyWeight>> {
        delegate!(self, bodyweight_history, @val user_id)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test code")]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (NutritionService, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(&dir.path().join("test.db")).unwrap();
        storage.create_user("alice", "a@example.com", "x").unwrap();
        storage.create_user("bob", "b@example.com", "x").unwrap();
        (NutritionService::new(storage), dir)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 3, d).unwrap()
    }

    #[tokio::test]
    async fn duplicate_weigh_in_is_field_error() {
        let (service, _dir) = setup();
        let input = BodyWeightInput { date: day(1), weight: 80 };
        service.record_bodyweight(1, &input).await.unwrap();

        let err = service.record_bodyweight(1, &input).await.unwrap_err();
        let ServiceError::Validation(errors) = err else { panic!("expected validation error") };
        assert_eq!(errors.for_field("date"), Some(DUPLICATE_BODYWEIGHT));
    }

    #[tokio::test]
    async fn only_owner_edits_nutrition() {
        let (service, _dir) = setup();
        let input = NutritionInput { date: day(1), calories: 2000, protein: 1, carbs: 1, fats: 1 };
        let record = service.record_nutrition(1, &input).await.unwrap();

        let err = service.edit_nutrition(2, record.id, &input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn summary_respects_window() {
        let (service, _dir) = setup();
        for d in [1, 10, 12] {
            let input = NutritionInput { date: day(d), calories: 2000 + d, protein: 100, carbs: 200, fats: 50 };
            service.record_nutrition(1, &input).await.unwrap();
        }

        let summary = service.nutrition_summary(1, 5, day(12)).await.unwrap();
        assert_eq!(summary.calorie_tracker.len(), 2);
        assert_eq!(summary.macros.protein, 200);
        assert!(summary.macro_breakdown.workout_days.is_empty());
        assert_eq!(summary.macro_breakdown.rest_days, [100.0, 200.0, 50.0]);

        let averages = service.average_calories(1).await.unwrap();
        assert_eq!(averages.workout_days, None);
        assert!(averages.rest_days.is_some());
    }
}
