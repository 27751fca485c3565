//! Calorie and macro aggregates, split by workout and rest days.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::nutrition::DailyNutrition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Workout,
    Rest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MacroTotals {
    pub protein: u64,
    pub carbs: u64,
    pub fats: u64,
}

/// Average `[protein, carbs, fats]` per record on each kind of day. A list
/// is empty when no record falls on that kind of day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MacroBreakdown {
    pub workout_days: Vec<f64>,
    pub rest_days: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NutritionSummary {
    #[serde(rename = "calorie-tracker")]
    pub calorie_tracker: BTreeMap<NaiveDate, u32>,
    pub macros: MacroTotals,
    #[serde(rename = "macro-breakdown")]
    pub macro_breakdown: MacroBreakdown,
}

fn day_kind(record: &DailyNutrition, workout_dates: &BTreeSet<NaiveDate>) -> DayKind {
    if workout_dates.contains(&record.date) { DayKind::Workout } else { DayKind::Rest }
}

fn average_macros<'a>(records: impl Iterator<Item = &'a DailyNutrition>) -> Vec<f64> {
    let mut count = 0_u32;
    let mut sums = [0_u64; 3];
    for record in records {
        count += 1;
        sums[0] += u64::from(record.protein);
        sums[1] += u64::from(record.carbs);
        sums[2] += u64::from(record.fats);
    }
    if count == 0 {
        return Vec::new();
    }
    sums.iter().map(|s| *s as f64 / f64::from(count)).collect()
}

/// Chart data for the nutrition page over an already date-filtered window.
#[must_use]
pub fn nutrition_summary(
    records: &[DailyNutrition],
    workout_dates: &BTreeSet<NaiveDate>,
) -> NutritionSummary {
    let mut summary = NutritionSummary::default();
    for record in records {
        summary.calorie_tracker.insert(record.date, record.calories);
        summary.macros.protein += u64::from(record.protein);
        summary.macros.carbs += u64::from(record.carbs);
        summary.macros.fats += u64::from(record.fats);
    }
    summary.macro_breakdown = MacroBreakdown {
        workout_days: average_macros(
            records.iter().filter(|r| day_kind(r, workout_dates) == DayKind::Workout),
        ),
        rest_days: average_macros(
            records.iter().filter(|r| day_kind(r, workout_dates) == DayKind::Rest),
        ),
    };
    summary
}

/// Mean calories over records falling on `kind` days, `None` when there are
/// none.
#[must_use]
pub fn average_calories(
    records: &[DailyNutrition],
    workout_dates: &BTreeSet<NaiveDate>,
    kind: DayKind,
) -> Option<f64> {
    let calories: Vec<u32> = records
        .iter()
        .filter(|r| day_kind(r, workout_dates) == kind)
        .map(|r| r.calories)
        .collect();
    if calories.is_empty() {
        return None;
    }
    let total: u64 = calories.iter().map(|c| u64::from(*c)).sum();
    Some(total as f64 / calories.len() as f64)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test code")]
mod tests {
    use chrono::Utc;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2014, 7, d).unwrap()
    }

    fn record(d: u32, calories: u32, protein: u32, carbs: u32, fats: u32) -> DailyNutrition {
        DailyNutrition {
            id: i64::from(d),
            user_id: 1,
            date: day(d),
            calories,
            protein,
            carbs,
            fats,
            created_on: Utc::now(),
        }
    }

    #[test]
    fn breakdown_averages_per_record_in_group() {
        let records = vec![
            record(1, 3000, 200, 300, 100),
            record(2, 2000, 100, 200, 60),
            record(3, 2200, 140, 220, 80),
        ];
        let workout_dates: BTreeSet<_> = [day(1), day(5), day(9)].into_iter().collect();
        let summary = nutrition_summary(&records, &workout_dates);
        assert_eq!(summary.macro_breakdown.workout_days, [200.0, 300.0, 100.0]);
        assert_eq!(summary.macro_breakdown.rest_days, [120.0, 210.0, 70.0]);
        assert_eq!(summary.macros.protein, 440);
        assert_eq!(summary.calorie_tracker[&day(2)], 2000);
    }

    #[test]
    fn empty_group_gives_empty_list() {
        let records = vec![record(1, 3000, 200, 300, 100)];
        let summary = nutrition_summary(&records, &BTreeSet::new());
        assert!(summary.macro_breakdown.workout_days.is_empty());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["macro-breakdown"]["workout_days"], serde_json::json!([]));
        assert_eq!(json["calorie-tracker"]["2014-07-01"], 3000);
    }

    #[test]
    fn average_calories_absent_without_records() {
        let records = vec![record(1, 3000, 0, 0, 0), record(3, 2000, 0, 0, 0)];
        let workout_dates: BTreeSet<_> = [day(1)].into_iter().collect();
        assert_eq!(average_calories(&records, &workout_dates, DayKind::Workout), Some(3000.0));
        assert_eq!(average_calories(&records, &workout_dates, DayKind::Rest), Some(2000.0));
        assert_eq!(average_calories(&[], &workout_dates, DayKind::Rest), None);
    }
}
